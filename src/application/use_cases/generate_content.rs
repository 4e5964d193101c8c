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

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::application::dto::GenerateContentResponse;
use crate::domain::models::crawl::{CrawlResult, CrawlTarget, Session};
use crate::domain::services::crawl_service::ConcurrentCrawler;
use crate::infrastructure::cache::ContentCache;
use crate::queue::task_queue::{PipelineTask, QueueError, TaskQueue};
use crate::utils::validators::ValidationError;

/// 触发路径错误类型
#[derive(Error, Debug)]
pub enum TriggerError {
    #[error(transparent)]
    InvalidUrl(#[from] ValidationError),

    #[error("缓存错误: {0}")]
    Cache(String),

    #[error("队列错误: {0}")]
    Queue(#[from] QueueError),
}

/// 内容生成触发用例
///
/// 同步请求路径：校验URL、建立会话、必要时执行爬取、
/// 向任务队列投递管道任务，最后返回会话ID与链接列表。
/// 本用例从不等待管道完成
pub struct GenerateContentUseCase {
    crawler: Arc<ConcurrentCrawler>,
    cache: Arc<ContentCache>,
    queue: Arc<dyn TaskQueue>,
}

impl GenerateContentUseCase {
    /// 创建新的内容生成触发用例
    ///
    /// # 参数
    ///
    /// * `crawler` - 并发爬虫
    /// * `cache` - 内容缓存
    /// * `queue` - 任务队列
    pub fn new(
        crawler: Arc<ConcurrentCrawler>,
        cache: Arc<ContentCache>,
        queue: Arc<dyn TaskQueue>,
    ) -> Self {
        Self {
            crawler,
            cache,
            queue,
        }
    }

    /// 执行触发流程
    ///
    /// links缓存命中时跳过爬取，向管道投递空的爬取结果；
    /// 未命中时爬取后投递完整结果，且仅当发现至少一条子链接时写入links缓存。
    /// 响应中的links始终在末尾附加种子URL自身
    #[instrument(skip(self))]
    pub async fn execute(&self, url: &str) -> Result<GenerateContentResponse, TriggerError> {
        let target = CrawlTarget::new(url)?;
        let session = Session::new();

        if let Some(cached) = self
            .cache
            .get_links(url)
            .await
            .map_err(|e| TriggerError::Cache(e.to_string()))?
        {
            info!("Links cache hit for {}", url);
            self.queue
                .enqueue(PipelineTask::new(
                    session.id.clone(),
                    CrawlResult::empty(url),
                ))
                .await?;

            let mut links = cached;
            links.push(url.to_string());
            return Ok(GenerateContentResponse {
                session_id: session.id,
                links,
            });
        }

        let result = self.crawler.crawl_all(&target).await;
        let mut links: Vec<String> = result.sampled_links.iter().cloned().collect();
        links.sort();

        self.queue
            .enqueue(PipelineTask::new(session.id.clone(), result))
            .await?;

        // 一无所获的爬取不缓存，下次请求重新爬取
        if !links.is_empty() {
            if let Err(e) = self.cache.set_links(url, &links).await {
                warn!("Failed to cache links for {}: {}", url, e);
            }
        }

        links.push(url.to_string());
        Ok(GenerateContentResponse {
            session_id: session.id,
            links,
        })
    }
}
