// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::application::use_cases::process_crawl::ProcessCrawlUseCase;
use crate::queue::task_queue::TaskQueue;
use crate::workers::pipeline_worker::PipelineWorker;

/// 工作管理器
pub struct WorkerManager<Q>
where
    Q: TaskQueue + 'static,
{
    queue: Arc<Q>,
    use_case: Arc<ProcessCrawlUseCase>,
    handles: Vec<JoinHandle<()>>,
}

impl<Q> WorkerManager<Q>
where
    Q: TaskQueue + Send + Sync,
{
    /// 创建新的工作管理器实例
    ///
    /// # 参数
    ///
    /// * `queue` - 任务队列
    /// * `use_case` - 爬取处理用例
    pub fn new(queue: Arc<Q>, use_case: Arc<ProcessCrawlUseCase>) -> Self {
        Self {
            queue,
            use_case,
            handles: Vec::new(),
        }
    }

    /// 启动工作进程
    ///
    /// 创建并启动指定数量的工作进程
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作进程数量
    pub async fn start_workers(&mut self, count: usize) {
        for _ in 0..count {
            let worker = PipelineWorker::new(self.use_case.clone());
            let queue = self.queue.clone();
            let handle = tokio::spawn(async move {
                worker.run(queue).await;
            });
            self.handles.push(handle);
        }
    }

    /// 等待关闭信号并关闭工作进程
    ///
    /// 监听关闭信号并优雅地关闭所有工作进程
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }

        info!("Shutting down workers...");
        for handle in &self.handles {
            handle.abort();
        }

        info!("Workers shut down successfully");
    }
}
