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

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::domain::models::session_event::SessionEvent;
use crate::domain::repositories::website_repository::WebsiteRepository;
use crate::domain::services::question_generator::QuestionGeneratorTrait;
use crate::infrastructure::cache::ContentCache;
use crate::infrastructure::events::EventChannel;
use crate::queue::task_queue::PipelineTask;
use crate::utils::errors::PipelineError;

/// 缓存命中路径的发布延迟
///
/// 给订阅方留出建立事件流的时间，避免载荷在订阅之前被丢弃
const CACHE_HIT_DELAY: Duration = Duration::from_secs(1);

/// 爬取处理用例
///
/// 管道协调器：按缓存、数据库、生成的顺序取得问题，
/// 发布载荷事件，并保证每个会话恰好以一条终止事件收尾
pub struct ProcessCrawlUseCase {
    cache: Arc<ContentCache>,
    repository: Arc<dyn WebsiteRepository>,
    generator: Arc<dyn QuestionGeneratorTrait>,
    events: Arc<dyn EventChannel>,
    cache_hit_delay: Duration,
}

impl ProcessCrawlUseCase {
    /// 创建新的爬取处理用例
    ///
    /// # 参数
    ///
    /// * `cache` - 内容缓存
    /// * `repository` - 网站仓库
    /// * `generator` - 问题生成服务
    /// * `events` - 会话事件通道
    pub fn new(
        cache: Arc<ContentCache>,
        repository: Arc<dyn WebsiteRepository>,
        generator: Arc<dyn QuestionGeneratorTrait>,
        events: Arc<dyn EventChannel>,
    ) -> Self {
        Self::new_with_delay(cache, repository, generator, events, CACHE_HIT_DELAY)
    }

    /// 使用自定义缓存命中延迟创建用例
    pub fn new_with_delay(
        cache: Arc<ContentCache>,
        repository: Arc<dyn WebsiteRepository>,
        generator: Arc<dyn QuestionGeneratorTrait>,
        events: Arc<dyn EventChannel>,
        cache_hit_delay: Duration,
    ) -> Self {
        Self {
            cache,
            repository,
            generator,
            events,
            cache_hit_delay,
        }
    }

    /// 处理一个管道任务
    ///
    /// 处理过程中的任何错误被转换为该会话的Error终止事件，
    /// 成功则以Complete收尾。本方法自身从不失败
    #[instrument(skip(self, task), fields(session_id = %task.session_id))]
    pub async fn run(&self, task: &PipelineTask) {
        let terminal = match self.process(task).await {
            Ok(()) => SessionEvent::complete(),
            Err(e) => {
                error!("Pipeline failed for session {}: {}", task.session_id, e);
                SessionEvent::error(e.to_string())
            }
        };

        if let Err(e) = self.events.publish(&task.session_id, &terminal).await {
            error!(
                "Failed to publish terminal event for session {}: {}",
                task.session_id, e
            );
        }
    }

    async fn process(&self, task: &PipelineTask) -> Result<(), PipelineError> {
        let url = &task.crawl_result.seed_url;

        if let Some(questions) = self
            .cache
            .get_questions(url)
            .await
            .map_err(|e| PipelineError::CacheError(e.to_string()))?
        {
            info!("Questions cache hit for {}", url);
            sleep(self.cache_hit_delay).await;
            self.events
                .publish(
                    &task.session_id,
                    &SessionEvent::payload(url.clone(), questions),
                )
                .await?;
            return Ok(());
        }

        if let Some(questions) = self.repository.find_questions_by_url(url).await? {
            info!("Found persisted questions for {}", url);
            self.events
                .publish(
                    &task.session_id,
                    &SessionEvent::payload(url.clone(), questions),
                )
                .await?;
            return Ok(());
        }

        let questions = self
            .generator
            .generate_questions(&task.crawl_result)
            .await
            .map_err(|e| PipelineError::GenerationError(e.to_string()))?;

        if questions.is_empty() {
            info!("Generator produced no questions for {}", url);
            return Ok(());
        }

        if let Err(e) = self.cache.set_questions(url, &questions).await {
            warn!("Failed to cache questions for {}: {}", url, e);
        }

        let content = task.crawl_result.main_text.as_str();
        let website = self
            .repository
            .create_website(url, (!content.is_empty()).then_some(content))
            .await?;
        self.repository
            .bulk_create_questions(website.id, &questions)
            .await?;

        self.events
            .publish(
                &task.session_id,
                &SessionEvent::payload(url.clone(), questions),
            )
            .await?;
        Ok(())
    }
}
