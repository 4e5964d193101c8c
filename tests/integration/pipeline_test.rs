// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 端到端管道测试
//!
//! 通过触发用例、内存队列与处理用例走完整条链路，
//! 从订阅方视角断言事件序列

use std::sync::Arc;
use std::time::{Duration, Instant};

use quizcrawl::domain::models::crawl::CrawlResult;
use quizcrawl::domain::models::session_event::SessionEvent;
use quizcrawl::queue::task_queue::{PipelineTask, TaskQueue};
use quizcrawl::workers::pipeline_worker::PipelineWorker;

use crate::helpers::{
    collect_until_terminal, sample_questions, PipelineHarness, StaticFetcher, StubGenerator,
};

const SEED: &str = "https://example.com/";

#[tokio::test]
async fn test_full_pipeline_emits_payload_then_complete() {
    let fetcher = StaticFetcher::site(SEED, &["https://example.com/a", "https://example.com/b"]);
    let harness = PipelineHarness::new(
        fetcher,
        StubGenerator::ok(sample_questions()),
        Duration::ZERO,
    );

    let response = harness.trigger.execute(SEED).await.unwrap();
    let stream = harness.subscribe(&response.session_id).await;
    harness.process_next().await;

    // 响应链路：链接列表末尾附加种子URL
    assert_eq!(response.links.len(), 3);
    assert_eq!(response.links.last().map(String::as_str), Some(SEED));

    let events = collect_until_terminal(stream).await;
    assert_eq!(events.len(), 2);
    let SessionEvent::Payload { link, questions } = &events[0] else {
        panic!("expected payload, got {:?}", events[0]);
    };
    assert_eq!(link, SEED);
    assert_eq!(questions.len(), 2);
    assert_eq!(events[1], SessionEvent::complete());

    // 生成结果已持久化并写入缓存
    assert_eq!(harness.repo.website_count(), 1);
    assert!(harness.cache.get_questions(SEED).await.unwrap().is_some());
}

#[tokio::test]
async fn test_links_cache_hit_skips_crawl_but_still_streams() {
    // 没有任何可达页面：若走了爬取路径，links会是空的
    let harness = PipelineHarness::new(
        StaticFetcher::unreachable(),
        StubGenerator::ok(sample_questions()),
        Duration::ZERO,
    );
    harness
        .cache
        .set_links(
            SEED,
            &[
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ],
        )
        .await
        .unwrap();

    let response = harness.trigger.execute(SEED).await.unwrap();
    let stream = harness.subscribe(&response.session_id).await;
    harness.process_next().await;

    assert_eq!(response.links.len(), 3);

    // 管道侧依旧推进到生成并交付
    let events = collect_until_terminal(stream).await;
    assert!(matches!(events[0], SessionEvent::Payload { .. }));
    assert_eq!(events[1], SessionEvent::complete());
    assert_eq!(harness.generator.call_count(), 1);
}

#[tokio::test]
async fn test_questions_cache_hit_delays_then_streams_without_generator() {
    let delay = Duration::from_millis(100);
    let harness = PipelineHarness::new(
        StaticFetcher::site(SEED, &[]),
        StubGenerator::failing("must not be called"),
        delay,
    );
    harness
        .cache
        .set_questions(SEED, &sample_questions())
        .await
        .unwrap();

    let response = harness.trigger.execute(SEED).await.unwrap();
    let stream = harness.subscribe(&response.session_id).await;

    let started = Instant::now();
    harness.process_next().await;
    assert!(started.elapsed() >= delay);

    let events = collect_until_terminal(stream).await;
    assert!(matches!(events[0], SessionEvent::Payload { .. }));
    assert_eq!(events[1], SessionEvent::complete());
    assert_eq!(harness.generator.call_count(), 0);
    assert_eq!(harness.repo.website_count(), 0);
}

#[tokio::test]
async fn test_generator_failure_streams_error_without_complete() {
    let harness = PipelineHarness::new(
        StaticFetcher::site(SEED, &[]),
        StubGenerator::failing("model unavailable"),
        Duration::ZERO,
    );

    let response = harness.trigger.execute(SEED).await.unwrap();
    let stream = harness.subscribe(&response.session_id).await;
    harness.process_next().await;

    let events = collect_until_terminal(stream).await;
    assert_eq!(events.len(), 1);
    let SessionEvent::Error { error, .. } = &events[0] else {
        panic!("expected error event, got {:?}", events[0]);
    };
    assert!(error.contains("model unavailable"));
    assert_eq!(harness.repo.website_count(), 0);
}

#[tokio::test]
async fn test_second_request_served_from_questions_cache() {
    let fetcher = StaticFetcher::site(SEED, &["https://example.com/a", "https://example.com/b"]);
    let harness = PipelineHarness::new(
        fetcher,
        StubGenerator::ok(sample_questions()),
        Duration::ZERO,
    );

    let first = harness.trigger.execute(SEED).await.unwrap();
    let first_stream = harness.subscribe(&first.session_id).await;
    harness.process_next().await;
    let first_events = collect_until_terminal(first_stream).await;
    assert_eq!(first_events.len(), 2);
    assert_eq!(harness.generator.call_count(), 1);

    let second = harness.trigger.execute(SEED).await.unwrap();
    assert_ne!(first.session_id, second.session_id);
    let second_stream = harness.subscribe(&second.session_id).await;
    harness.process_next().await;
    let second_events = collect_until_terminal(second_stream).await;
    assert_eq!(second_events.len(), 2);

    // 第二次请求完全由缓存供给
    assert_eq!(harness.generator.call_count(), 1);
}

#[tokio::test]
async fn test_worker_loop_drains_queue() {
    let harness = PipelineHarness::new(
        StaticFetcher::site(SEED, &[]),
        StubGenerator::ok(sample_questions()),
        Duration::ZERO,
    );

    // 会话ID预先选定，订阅先于任何发布建立
    let stream = harness.subscribe("worker-session").await;
    harness
        .queue
        .enqueue(PipelineTask::new(
            "worker-session".to_string(),
            CrawlResult {
                seed_url: SEED.to_string(),
                main_text: "seed text".to_string(),
                sampled_links: Default::default(),
                link_texts: Default::default(),
            },
        ))
        .await
        .unwrap();

    let worker = PipelineWorker::new(harness.process.clone());
    let queue = harness.queue.clone();
    let handle = tokio::spawn(async move {
        worker.run(queue).await;
    });

    let events = collect_until_terminal(stream).await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[1], SessionEvent::complete());

    handle.abort();
}
