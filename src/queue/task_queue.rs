// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::models::crawl::CrawlResult;

/// 管道任务
///
/// 将一次爬取的产物与其会话绑定，交由后台工作者处理
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineTask {
    /// 任务ID
    pub id: Uuid,
    /// 会话ID
    pub session_id: String,
    /// 爬取结果
    pub crawl_result: CrawlResult,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl PipelineTask {
    /// 创建新的管道任务
    pub fn new(session_id: String, crawl_result: CrawlResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            crawl_result,
            created_at: Utc::now(),
        }
    }
}

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 队列已关闭
    #[error("Queue closed")]
    Closed,
}

/// 任务队列特质
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// 入队任务，必须立即返回
    async fn enqueue(&self, task: PipelineTask) -> Result<(), QueueError>;

    /// 出队任务
    ///
    /// 队列为空时挂起等待，仅在队列关闭后返回None
    async fn dequeue(&self) -> Result<Option<PipelineTask>, QueueError>;
}

/// 内存任务队列实现
///
/// 无界通道保证入队从不阻塞调用方
pub struct InMemoryTaskQueue {
    sender: mpsc::UnboundedSender<PipelineTask>,
    receiver: Mutex<mpsc::UnboundedReceiver<PipelineTask>>,
}

impl InMemoryTaskQueue {
    /// 创建新的内存任务队列实例
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }
}

impl Default for InMemoryTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn enqueue(&self, task: PipelineTask) -> Result<(), QueueError> {
        self.sender.send(task).map_err(|_| QueueError::Closed)
    }

    async fn dequeue(&self) -> Result<Option<PipelineTask>, QueueError> {
        let mut receiver = self.receiver.lock().await;
        Ok(receiver.recv().await)
    }
}

#[async_trait]
impl<T: TaskQueue + ?Sized> TaskQueue for Arc<T> {
    async fn enqueue(&self, task: PipelineTask) -> Result<(), QueueError> {
        (**self).enqueue(task).await
    }

    async fn dequeue(&self) -> Result<Option<PipelineTask>, QueueError> {
        (**self).dequeue().await
    }
}
