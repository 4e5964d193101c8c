// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 会话事件通道
//!
//! 管道侧逐条发布会话事件，SSE侧按会话订阅。
//! 通道不持久化：订阅建立之前发布的事件不会被重放

use std::pin::Pin;

use async_trait::async_trait;
use dashmap::DashMap;
use futures::{Stream, StreamExt};
use tokio::sync::broadcast;
use tracing::warn;

use crate::domain::models::session_event::SessionEvent;
use crate::infrastructure::cache::redis_client::RedisClient;
use crate::utils::errors::ChannelError;

/// 会话事件流
pub type EventStream = Pin<Box<dyn Stream<Item = SessionEvent> + Send>>;

/// 会话事件通道特质
#[async_trait]
pub trait EventChannel: Send + Sync {
    /// 向指定会话发布一条事件
    async fn publish(&self, session_id: &str, event: &SessionEvent) -> Result<(), ChannelError>;

    /// 订阅指定会话的事件流
    async fn subscribe(&self, session_id: &str) -> Result<EventStream, ChannelError>;
}

fn channel_name(session_id: &str) -> String {
    format!("questions:{}", session_id)
}

/// 基于Redis pub/sub的会话事件通道
#[derive(Clone)]
pub struct RedisEventChannel {
    redis: RedisClient,
}

impl RedisEventChannel {
    /// 创建新的Redis事件通道实例
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl EventChannel for RedisEventChannel {
    async fn publish(&self, session_id: &str, event: &SessionEvent) -> Result<(), ChannelError> {
        let message = serde_json::to_string(event)
            .map_err(|e| ChannelError::PublishFailed(e.to_string()))?;
        self.redis
            .publish(&channel_name(session_id), &message)
            .await
            .map_err(|e| ChannelError::PublishFailed(e.to_string()))
    }

    async fn subscribe(&self, session_id: &str) -> Result<EventStream, ChannelError> {
        let pubsub = self
            .redis
            .subscribe(&channel_name(session_id))
            .await
            .map_err(|e| ChannelError::SubscribeFailed(e.to_string()))?;

        let stream = pubsub.into_on_message().filter_map(|message| async move {
            let payload: String = match message.get_payload() {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Skipping non-text pubsub message: {}", e);
                    return None;
                }
            };
            match serde_json::from_str::<SessionEvent>(&payload) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!("Skipping malformed session event: {}", e);
                    None
                }
            }
        });

        Ok(Box::pin(stream))
    }
}

/// 内存会话事件通道
///
/// 基于tokio broadcast的进程内实现，用于测试与单机部署
#[derive(Default)]
pub struct InMemoryEventChannel {
    senders: DashMap<String, broadcast::Sender<SessionEvent>>,
}

impl InMemoryEventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender(&self, session_id: &str) -> broadcast::Sender<SessionEvent> {
        self.senders
            .entry(session_id.to_string())
            .or_insert_with(|| broadcast::channel(64).0)
            .clone()
    }
}

#[async_trait]
impl EventChannel for InMemoryEventChannel {
    async fn publish(&self, session_id: &str, event: &SessionEvent) -> Result<(), ChannelError> {
        // 无订阅者时发布即丢弃，与Redis pub/sub语义一致
        let _ = self.sender(session_id).send(event.clone());
        // 会话以终止事件收尾后回收条目，发送端掉落使存量订阅读尽后关闭
        if event.is_terminal() {
            self.senders.remove(session_id);
        }
        Ok(())
    }

    async fn subscribe(&self, session_id: &str) -> Result<EventStream, ChannelError> {
        let receiver = self.sender(session_id).subscribe();
        let stream = futures::stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => return Some((event, receiver)),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Session event subscriber lagged, skipped {}", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });
        Ok(Box::pin(stream))
    }
}
