// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

/// 存储层错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("存储错误: {0}")]
    Other(String),
}

/// 对象存储仓库
///
/// 保存二进制对象并返回可公开访问的URL
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// 保存对象
    ///
    /// # 参数
    ///
    /// * `key` - 对象键
    /// * `data` - 对象内容
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 对象的公开访问URL
    /// * `Err(StorageError)` - 保存过程中出现的错误
    async fn save(&self, key: &str, data: &[u8]) -> Result<String, StorageError>;
}
