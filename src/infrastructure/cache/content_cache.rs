// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::question::QuestionItem;
use crate::infrastructure::cache::redis_client::RedisClient;

/// 键值缓存存储特质
///
/// 缓存后端可注入，生产环境使用Redis，测试使用内存实现
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 获取指定键的值
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// 设置键值对并指定过期时间
    async fn set(&self, key: &str, value: &str, ttl_seconds: usize) -> Result<()>;
}

/// 内存缓存存储
///
/// 进程内实现，不支持过期，用于测试与单机部署
#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: parking_lot::Mutex<std::collections::HashMap<String, String>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, _ttl_seconds: usize) -> Result<()> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl CacheStore for RedisClient {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        RedisClient::get(self, key).await
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: usize) -> Result<()> {
        RedisClient::set(self, key, value, ttl_seconds).await
    }
}

/// 内容缓存
///
/// 按URL维度缓存爬取产物：站内链接列表、生成的问题、预览图地址。
/// 键空间为 `{url}:links`、`{url}:questions`、`{url}:img`
pub struct ContentCache {
    store: std::sync::Arc<dyn CacheStore>,
    ttl_seconds: usize,
}

impl ContentCache {
    /// 创建新的内容缓存实例
    ///
    /// # 参数
    ///
    /// * `store` - 缓存存储后端
    /// * `ttl_seconds` - 缓存条目过期时间（秒）
    pub fn new(store: std::sync::Arc<dyn CacheStore>, ttl_seconds: usize) -> Self {
        Self { store, ttl_seconds }
    }

    /// 获取URL对应的已缓存站内链接
    pub async fn get_links(&self, url: &str) -> Result<Option<Vec<String>>> {
        match self.store.get(&format!("{}:links", url)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// 缓存URL对应的站内链接
    pub async fn set_links(&self, url: &str, links: &[String]) -> Result<()> {
        let raw = serde_json::to_string(links)?;
        self.store
            .set(&format!("{}:links", url), &raw, self.ttl_seconds)
            .await
    }

    /// 获取URL对应的已缓存问题
    pub async fn get_questions(&self, url: &str) -> Result<Option<Vec<QuestionItem>>> {
        match self.store.get(&format!("{}:questions", url)).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// 缓存URL对应的问题
    pub async fn set_questions(&self, url: &str, questions: &[QuestionItem]) -> Result<()> {
        let raw = serde_json::to_string(questions)?;
        self.store
            .set(&format!("{}:questions", url), &raw, self.ttl_seconds)
            .await
    }

    /// 获取URL对应的已缓存预览图地址
    pub async fn get_preview(&self, url: &str) -> Result<Option<String>> {
        self.store.get(&format!("{}:img", url)).await
    }

    /// 缓存URL对应的预览图地址
    pub async fn set_preview(&self, url: &str, image_url: &str) -> Result<()> {
        self.store
            .set(&format!("{}:img", url), image_url, self.ttl_seconds)
            .await
    }
}
