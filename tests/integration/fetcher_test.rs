// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 抓取引擎集成测试
//!
//! 使用wiremock模拟站点，验证真实HTTP路径上的文本与链接提取

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quizcrawl::engines::traits::{FetchError, PageFetcher};
use quizcrawl::engines::ReqwestFetcher;
use quizcrawl::utils::validators;

const PAGE: &str = r#"
<html>
  <head><title>Shop</title><style>.hidden { display: none }</style></head>
  <body>
    <nav>Top navigation</nav>
    <h1>Handmade ceramics</h1>
    <p>Bowls, cups and   plates fired in our studio.</p>
    <a href="/catalog">Catalog</a>
    <a href="/about">About us</a>
    <a href="https://instagram.com/shop">Instagram</a>
    <a href="/files/catalog.pdf">PDF catalog</a>
    <script>trackVisitor();</script>
    <footer>All rights reserved</footer>
  </body>
</html>"#;

#[tokio::test]
async fn test_fetches_text_and_in_scope_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let page_url = format!("{}/", server.uri());
    let origin = validators::origin_of(&page_url).unwrap();

    let fetcher = ReqwestFetcher::new(Duration::from_secs(5)).unwrap();
    let page = fetcher.fetch(&page_url, &origin, true).await.unwrap();

    assert!(page.text.contains("Handmade ceramics"));
    assert!(page.text.contains("Bowls, cups and plates"));
    assert!(!page.text.contains("Top navigation"));
    assert!(!page.text.contains("trackVisitor"));
    assert!(!page.text.contains("All rights reserved"));

    assert!(page.links.contains(&format!("{}/catalog", server.uri())));
    assert!(page.links.contains(&format!("{}/about", server.uri())));
    assert!(!page.links.iter().any(|l| l.contains("instagram.com")));
    assert!(!page.links.iter().any(|l| l.ends_with(".pdf")));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let page_url = format!("{}/missing", server.uri());
    let origin = validators::origin_of(&page_url).unwrap();

    let fetcher = ReqwestFetcher::new(Duration::from_secs(5)).unwrap();
    let result = fetcher.fetch(&page_url, &origin, true).await;

    assert!(matches!(result, Err(FetchError::Status(404))));
}

#[tokio::test]
async fn test_link_extraction_disabled_for_sublinks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sub"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PAGE)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let page_url = format!("{}/sub", server.uri());
    let origin = validators::origin_of(&page_url).unwrap();

    let fetcher = ReqwestFetcher::new(Duration::from_secs(5)).unwrap();
    let page = fetcher.fetch(&page_url, &origin, false).await.unwrap();

    assert!(!page.text.is_empty());
    assert!(page.links.is_empty());
}
