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

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Extension;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use quizcrawl::application::use_cases::generate_content::GenerateContentUseCase;
use quizcrawl::application::use_cases::preview_image::PreviewImageUseCase;
use quizcrawl::application::use_cases::process_crawl::ProcessCrawlUseCase;
use quizcrawl::config::settings::Settings;
use quizcrawl::domain::repositories::storage_repository::StorageRepository;
use quizcrawl::domain::repositories::website_repository::WebsiteRepository;
use quizcrawl::domain::services::crawl_service::ConcurrentCrawler;
use quizcrawl::domain::services::question_generator::{
    LlmQuestionGenerator, QuestionGeneratorTrait,
};
use quizcrawl::engines::screenshot::{HttpScreenshotRenderer, PreviewRenderer};
use quizcrawl::engines::ReqwestFetcher;
use quizcrawl::infrastructure::cache::{CacheStore, ContentCache, RedisClient};
use quizcrawl::infrastructure::database::connection;
use quizcrawl::infrastructure::events::{EventChannel, RedisEventChannel};
use quizcrawl::infrastructure::repositories::WebsiteRepoImpl;
use quizcrawl::infrastructure::storage::{LocalStorage, S3Storage};
use quizcrawl::presentation::routes;
use quizcrawl::queue::task_queue::{InMemoryTaskQueue, TaskQueue};
use quizcrawl::utils::telemetry;
use quizcrawl::workers::manager::WorkerManager;

use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting quizcrawl...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize Redis client, cache and event channel
    let redis_client = RedisClient::new(&settings.redis.url).await?;
    info!("Redis client initialized");

    let cache_store: Arc<dyn CacheStore> = Arc::new(redis_client.clone());
    let content_cache = Arc::new(ContentCache::new(cache_store, settings.cache.ttl_seconds));
    let events: Arc<dyn EventChannel> = Arc::new(RedisEventChannel::new(redis_client.clone()));

    // 5. Initialize crawler
    let fetcher = Arc::new(ReqwestFetcher::new(Duration::from_secs(
        settings.crawler.fetch_timeout_secs,
    ))?);
    let crawler = Arc::new(ConcurrentCrawler::new(
        fetcher,
        settings.crawler.max_concurrent,
        settings.crawler.batch_size,
    ));

    // 6. Initialize repositories and generator
    let website_repo: Arc<dyn WebsiteRepository> = Arc::new(WebsiteRepoImpl::new(db.clone()));
    let generator: Arc<dyn QuestionGeneratorTrait> = Arc::new(LlmQuestionGenerator::new_with_config(
        settings.generator.api_key.clone(),
        settings.generator.model.clone(),
        settings.generator.api_base_url.clone(),
    ));

    // 7. Start workers
    let queue = Arc::new(InMemoryTaskQueue::new());
    let process_use_case = Arc::new(ProcessCrawlUseCase::new(
        content_cache.clone(),
        website_repo,
        generator,
        events.clone(),
    ));
    let mut worker_manager = WorkerManager::new(queue.clone(), process_use_case);
    worker_manager.start_workers(settings.workers.count).await;
    info!("Started {} pipeline workers", settings.workers.count);

    // 8. Initialize preview components
    let storage: Arc<dyn StorageRepository> = if settings.storage.storage_type == "s3" {
        Arc::new(S3Storage::new(
            settings
                .storage
                .s3_region
                .clone()
                .unwrap_or_else(|| "us-east-1".to_string()),
            settings.storage.s3_bucket.clone().unwrap_or_default(),
            settings.storage.s3_access_key.clone().unwrap_or_default(),
            settings.storage.s3_secret_key.clone().unwrap_or_default(),
            settings.storage.s3_endpoint.clone(),
        ))
    } else {
        Arc::new(LocalStorage::new(
            PathBuf::from(
                settings
                    .storage
                    .local_path
                    .clone()
                    .unwrap_or_else(|| "./storage".to_string()),
            ),
            settings
                .storage
                .local_public_base
                .clone()
                .unwrap_or_else(|| "http://localhost:3000/previews".to_string()),
        ))
    };
    let renderer: Arc<dyn PreviewRenderer> = Arc::new(HttpScreenshotRenderer::new(
        settings.preview.render_endpoint.clone(),
        Duration::from_secs(settings.preview.render_timeout_secs),
    )?);
    let preview_use_case = Arc::new(PreviewImageUseCase::new(
        renderer,
        storage,
        content_cache.clone(),
    ));

    // 9. Start HTTP server
    let task_queue: Arc<dyn TaskQueue> = queue.clone();
    let generate_use_case = Arc::new(GenerateContentUseCase::new(
        crawler,
        content_cache,
        task_queue,
    ));

    let app = routes::routes()
        .layer(Extension(generate_use_case))
        .layer(Extension(preview_use_case))
        .layer(Extension(events))
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = worker_manager.wait_for_shutdown() => {}
    }

    Ok(())
}
