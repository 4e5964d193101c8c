// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::question::QuestionItem;
use crate::domain::models::website::Website;

/// 仓库层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("未找到数据")]
    NotFound,

    #[error("内部错误: {0}")]
    InternalError(String),
}

/// 网站与问题的持久化仓库
///
/// 管道的持久化协作方：登记来源网站，并为其批量挂载生成的问题
#[async_trait]
pub trait WebsiteRepository: Send + Sync {
    /// 登记来源网站
    async fn create_website(
        &self,
        url: &str,
        content: Option<&str>,
    ) -> Result<Website, RepositoryError>;

    /// 为网站批量创建问题及其选项
    ///
    /// 网站id未知时必须拒绝，返回`RepositoryError::NotFound`
    async fn bulk_create_questions(
        &self,
        website_id: Uuid,
        questions: &[QuestionItem],
    ) -> Result<(), RepositoryError>;

    /// 按URL查找已持久化的问题
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(..))` - 该URL已有问题记录
    /// * `Ok(None)` - 无记录
    async fn find_questions_by_url(
        &self,
        url: &str,
    ) -> Result<Option<Vec<QuestionItem>>, RepositoryError>;
}
