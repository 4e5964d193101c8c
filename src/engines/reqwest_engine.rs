// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::engines::traits::{FetchError, FetchedPage, PageFetcher};
use crate::utils::text_processing;
use crate::utils::url_utils;
use crate::utils::validators;

/// 非内容元素标签
///
/// 提取文本时跳过这些元素，保证结果只反映可见内容
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "header", "footer", "nav"];

/// 抓取引擎
///
/// 基于reqwest实现的HTTP单页抓取引擎
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// 创建新的抓取引擎实例
    ///
    /// # 参数
    ///
    /// * `timeout` - 单次请求超时时间
    ///
    /// # 返回值
    ///
    /// * `Ok(ReqwestFetcher)` - 抓取引擎实例
    /// * `Err(reqwest::Error)` - 客户端构建失败
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(
        &self,
        url: &str,
        origin: &str,
        extract_links: bool,
    ) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(extract_page(&body, url, origin, extract_links))
    }
}

/// 从HTML提取可见文本与站内链接
fn extract_page(body: &str, page_url: &str, origin: &str, extract_links: bool) -> FetchedPage {
    let document = Html::parse_document(body);

    let mut links = HashSet::new();
    if extract_links {
        // 选择器字面量固定，解析不会失败
        let selector = Selector::parse("a[href]").unwrap();
        let base = Url::parse(page_url).ok();

        if let Some(base) = base {
            for element in document.select(&selector) {
                let Some(href) = element.value().attr("href") else {
                    continue;
                };
                if href.starts_with('#')
                    || href.starts_with("mailto:")
                    || href.starts_with("javascript:")
                {
                    continue;
                }
                // 相对链接基于页面自身URL解析，范围校验基于爬取根
                if let Ok(absolute) = url_utils::resolve_url(&base, href) {
                    let mut clean = absolute;
                    clean.set_fragment(None);
                    let candidate = clean.to_string();
                    if validators::is_in_scope(&candidate, origin) {
                        links.insert(candidate);
                    }
                }
            }
        }
    }

    let mut raw_text = String::new();
    collect_visible_text(document.root_element(), &mut raw_text);

    FetchedPage {
        text: text_processing::normalize(&raw_text),
        links,
    }
}

/// 递归收集可见文本，跳过非内容元素与菜单类导航
fn collect_visible_text(element: ElementRef, out: &mut String) {
    for node in element.children() {
        if let Some(text) = node.value().as_text() {
            out.push(' ');
            out.push_str(text);
        } else if let Some(child) = node.value().as_element() {
            if NON_CONTENT_TAGS.contains(&child.name()) {
                continue;
            }
            if child.attr("class").is_some_and(|c| c.contains("menu")) {
                continue;
            }
            if let Some(child_ref) = ElementRef::wrap(node) {
                collect_visible_text(child_ref, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <html>
          <head><title>t</title><style>.x { color: red }</style></head>
          <body>
            <header>Site header</header>
            <nav>Navigation</nav>
            <div class="main-menu">Menu entries</div>
            <script>var tracked = true;</script>
            <p>Home   page
            content</p>
            <a href="/about">About</a>
            <a href="https://example.com/files/report.pdf">Report</a>
            <a href="https://other.com/external">External</a>
            <a href="#section">Anchor</a>
            <footer>Footer text</footer>
          </body>
        </html>"##;

    #[test]
    fn test_extracts_visible_text_only() {
        let page = extract_page(PAGE, "https://example.com/", "https://example.com", false);
        assert!(page.text.contains("Home page content"));
        assert!(!page.text.contains("tracked"));
        assert!(!page.text.contains("Site header"));
        assert!(!page.text.contains("Navigation"));
        assert!(!page.text.contains("Menu entries"));
        assert!(!page.text.contains("Footer text"));
        assert!(!page.text.contains("color: red"));
    }

    #[test]
    fn test_extracts_in_scope_links_only() {
        let page = extract_page(PAGE, "https://example.com/", "https://example.com", true);
        assert!(page.links.contains("https://example.com/about"));
        assert!(!page.links.iter().any(|l| l.contains("other.com")));
        assert!(!page.links.iter().any(|l| l.ends_with(".pdf")));
    }

    #[test]
    fn test_no_links_when_extraction_disabled() {
        let page = extract_page(PAGE, "https://example.com/", "https://example.com", false);
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_fragment_stripped_for_deduplication() {
        let body = r#"<a href="/a#one">x</a><a href="/a#two">y</a>"#;
        let page = extract_page(body, "https://example.com/", "https://example.com", true);
        assert_eq!(page.links.len(), 1);
        assert!(page.links.contains("https://example.com/a"));
    }
}
