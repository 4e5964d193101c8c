// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! HTTP接口集成测试
//!
//! 启动完整的axum应用并通过真实HTTP请求验证各端点

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Extension;
use tokio::net::TcpListener;

use quizcrawl::application::use_cases::preview_image::PreviewImageUseCase;
use quizcrawl::domain::models::session_event::SessionEvent;
use quizcrawl::domain::repositories::storage_repository::{StorageError, StorageRepository};
use quizcrawl::engines::screenshot::PreviewRenderer;
use quizcrawl::infrastructure::events::EventChannel;
use quizcrawl::presentation::routes;

use crate::helpers::{sample_questions, PipelineHarness, StaticFetcher, StubGenerator};

const SEED: &str = "https://example.com/";

struct StubRenderer;

#[async_trait]
impl PreviewRenderer for StubRenderer {
    async fn render(&self, _url: &str) -> anyhow::Result<Vec<u8>> {
        Ok(vec![0x89, 0x50, 0x4e, 0x47])
    }
}

struct StubStorage;

#[async_trait]
impl StorageRepository for StubStorage {
    async fn save(&self, key: &str, _data: &[u8]) -> Result<String, StorageError> {
        Ok(format!("https://cdn.test/{}", key))
    }
}

/// 启动测试应用，返回监听地址
async fn spawn_app(harness: &PipelineHarness) -> SocketAddr {
    let preview = Arc::new(PreviewImageUseCase::new(
        Arc::new(StubRenderer),
        Arc::new(StubStorage),
        harness.cache.clone(),
    ));
    let events: Arc<dyn EventChannel> = harness.events.clone();
    let app = routes::routes()
        .layer(Extension(harness.trigger.clone()))
        .layer(Extension(preview))
        .layer(Extension(events));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn harness() -> PipelineHarness {
    PipelineHarness::new(
        StaticFetcher::site(SEED, &["https://example.com/a", "https://example.com/b"]),
        StubGenerator::ok(sample_questions()),
        Duration::ZERO,
    )
}

#[tokio::test]
async fn test_health_and_version_endpoints() {
    let harness = harness();
    let addr = spawn_app(&harness).await;

    let health = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
    assert_eq!(health.status(), 200);
    assert_eq!(health.text().await.unwrap(), "OK");

    let version = reqwest::get(format!("http://{}/v1/version", addr))
        .await
        .unwrap();
    assert_eq!(version.status(), 200);
    assert!(!version.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_content_rejects_invalid_url() {
    let harness = harness();
    let addr = spawn_app(&harness).await;

    let response = reqwest::get(format!(
        "http://{}/generate-content?url=not-a-valid-url",
        addr
    ))
    .await
    .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Invalid URL"));
}

#[tokio::test]
async fn test_generate_content_returns_session_and_links() {
    let harness = harness();
    let addr = spawn_app(&harness).await;

    let response = reqwest::get(format!(
        "http://{}/generate-content?url={}",
        addr,
        urlencoded(SEED)
    ))
    .await
    .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(!body["session_id"].as_str().unwrap().is_empty());
    let links = body["links"].as_array().unwrap();
    assert_eq!(links.len(), 3);
    assert_eq!(links.last().unwrap(), SEED);
}

#[tokio::test]
async fn test_stream_delivers_frames_until_complete() {
    let harness = harness();
    let addr = spawn_app(&harness).await;

    // 建立SSE连接后再发布事件
    let response = reqwest::get(format!("http://{}/stream/sse-session", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    harness
        .events
        .publish(
            "sse-session",
            &SessionEvent::payload(SEED.to_string(), sample_questions()),
        )
        .await
        .unwrap();
    harness
        .events
        .publish("sse-session", &SessionEvent::complete())
        .await
        .unwrap();

    // 终止事件后服务端结束流，整个响应体可读完
    let body = tokio::time::timeout(Duration::from_secs(5), response.text())
        .await
        .unwrap()
        .unwrap();
    assert!(body.contains(r#""link":"https://example.com/""#));
    assert!(body.contains(r#"{"status":"complete"}"#));
}

#[tokio::test]
async fn test_preview_img_returns_cached_image_url() {
    let harness = harness();
    let addr = spawn_app(&harness).await;

    let first = reqwest::get(format!(
        "http://{}/preview-img?url={}",
        addr,
        urlencoded(SEED)
    ))
    .await
    .unwrap();
    assert_eq!(first.status(), 200);
    let body: serde_json::Value = first.json().await.unwrap();
    let image_url = body["image_url"].as_str().unwrap().to_string();
    assert!(image_url.starts_with("https://cdn.test/previews/"));

    // 第二次请求由缓存供给，URL不变
    let second = reqwest::get(format!(
        "http://{}/preview-img?url={}",
        addr,
        urlencoded(SEED)
    ))
    .await
    .unwrap();
    let body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(body["image_url"].as_str().unwrap(), image_url);
}

fn urlencoded(url: &str) -> String {
    url.replace(':', "%3A").replace('/', "%2F")
}
