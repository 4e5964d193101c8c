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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、Redis、服务器、爬虫、生成器与存储等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// Redis配置
    pub redis: RedisSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 爬虫配置
    pub crawler: CrawlerSettings,
    /// 缓存配置
    pub cache: CacheSettings,
    /// 问题生成器配置
    pub generator: GeneratorSettings,
    /// 工作者配置
    pub workers: WorkerSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// 预览截图配置
    pub preview: PreviewSettings,
}

/// 数据库配置设置
///
/// 连接池参数均有默认值，见`Settings::new`
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: u32,
    /// 最小连接数
    pub min_connections: u32,
    /// 连接超时时间（秒）
    pub connect_timeout: u64,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: u64,
}

/// Redis配置设置
#[derive(Debug, Deserialize)]
pub struct RedisSettings {
    /// Redis连接URL
    pub url: String,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 爬虫配置设置
#[derive(Debug, Deserialize)]
pub struct CrawlerSettings {
    /// 并发许可数，也是子链接抽样上限
    pub max_concurrent: usize,
    /// 批大小
    pub batch_size: usize,
    /// 单次请求超时时间（秒）
    pub fetch_timeout_secs: u64,
}

/// 缓存配置设置
#[derive(Debug, Deserialize)]
pub struct CacheSettings {
    /// 缓存条目过期时间（秒）
    pub ttl_seconds: usize,
}

/// 问题生成器配置设置
#[derive(Debug, Deserialize)]
pub struct GeneratorSettings {
    /// LLM API基础URL
    pub api_base_url: String,
    /// 使用的模型名称
    pub model: String,
    /// LLM API密钥
    pub api_key: Option<String>,
}

/// 工作者配置设置
#[derive(Debug, Deserialize)]
pub struct WorkerSettings {
    /// 工作进程数量
    pub count: usize,
}

/// 存储配置设置
#[derive(Debug, Deserialize)]
pub struct StorageSettings {
    /// 存储类型 (local, s3)
    pub storage_type: String,
    /// 本地存储路径 (当 type=local 时使用)
    pub local_path: Option<String>,
    /// 本地存储的公开URL前缀
    pub local_public_base: Option<String>,
    /// S3 区域
    pub s3_region: Option<String>,
    /// S3 存储桶名称
    pub s3_bucket: Option<String>,
    /// S3 访问密钥
    pub s3_access_key: Option<String>,
    /// S3 密钥
    pub s3_secret_key: Option<String>,
    /// S3 端点 (可选，用于 MinIO 等兼容服务)
    pub s3_endpoint: Option<String>,
}

/// 预览截图配置设置
#[derive(Debug, Deserialize)]
pub struct PreviewSettings {
    /// 渲染服务地址
    pub render_endpoint: String,
    /// 单次渲染超时时间（秒）
    pub render_timeout_secs: u64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.max_connections", 100)?
            .set_default("database.min_connections", 10)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default crawler settings
            .set_default("crawler.max_concurrent", 10)?
            .set_default("crawler.batch_size", 10)?
            .set_default("crawler.fetch_timeout_secs", 30)?
            // Default cache settings
            .set_default("cache.ttl_seconds", 3600)?
            // Default generator settings
            .set_default("generator.api_base_url", "https://api.openai.com/v1")?
            .set_default("generator.model", "gpt-3.5-turbo")?
            // Default worker settings
            .set_default("workers.count", 4)?
            // Default Storage settings
            .set_default("storage.storage_type", "local")?
            .set_default("storage.local_path", "./storage")?
            .set_default("storage.local_public_base", "http://localhost:3000/previews")?
            // Default preview settings
            .set_default("preview.render_endpoint", "http://localhost:3001/render")?
            .set_default("preview.render_timeout_secs", 30)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("QUIZCRAWL").separator("__"));

        builder.build()?.try_deserialize()
    }
}
