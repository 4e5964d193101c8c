// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info};
use uuid::Uuid;

use crate::application::use_cases::process_crawl::ProcessCrawlUseCase;
use crate::queue::task_queue::TaskQueue;

/// 管道工作者
///
/// 从任务队列取任务并交给处理用例。任务处理本身从不失败，
/// 队列层错误退避后重试
pub struct PipelineWorker {
    use_case: Arc<ProcessCrawlUseCase>,
    worker_id: Uuid,
}

impl PipelineWorker {
    /// 创建新的管道工作者实例
    pub fn new(use_case: Arc<ProcessCrawlUseCase>) -> Self {
        Self {
            use_case,
            worker_id: Uuid::new_v4(),
        }
    }

    /// 运行工作者循环
    ///
    /// 队列关闭后返回
    pub async fn run<Q>(&self, queue: Arc<Q>)
    where
        Q: TaskQueue + Send + Sync,
    {
        info!("Pipeline worker {} started", self.worker_id);

        loop {
            match queue.dequeue().await {
                Ok(Some(task)) => {
                    info!(
                        "Worker {} processing session {}",
                        self.worker_id, task.session_id
                    );
                    self.use_case.run(&task).await;
                }
                Ok(None) => {
                    info!("Worker {} stopping: queue closed", self.worker_id);
                    break;
                }
                Err(e) => {
                    error!("Worker {} dequeue error: {}", self.worker_id, e);
                    sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }
}
