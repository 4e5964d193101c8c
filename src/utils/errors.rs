// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 管道错误类型
///
/// 会话处理管道中任何阶段（缓存检查、生成、持久化、发布）产生的错误，
/// 统一以一条终止 Error 事件上报给订阅方
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("缓存错误: {0}")]
    CacheError(String),

    #[error("生成错误: {0}")]
    GenerationError(String),

    #[error("仓库错误: {0}")]
    RepositoryError(#[from] crate::domain::repositories::website_repository::RepositoryError),

    #[error("事件通道错误: {0}")]
    ChannelError(#[from] ChannelError),
}

/// 事件通道错误类型
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("发布失败: {0}")]
    PublishFailed(String),

    #[error("订阅失败: {0}")]
    SubscribeFailed(String),
}
