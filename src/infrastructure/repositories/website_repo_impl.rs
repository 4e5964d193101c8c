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

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::question::QuestionItem;
use crate::domain::models::website::Website;
use crate::domain::repositories::website_repository::{RepositoryError, WebsiteRepository};
use crate::infrastructure::database::entities::{question, question_option, website};

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        RepositoryError::DatabaseError(err.to_string())
    }
}

/// 网站仓库实现
#[derive(Clone)]
pub struct WebsiteRepoImpl {
    db: Arc<DatabaseConnection>,
}

impl WebsiteRepoImpl {
    /// 创建新的网站仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WebsiteRepository for WebsiteRepoImpl {
    /// 登记来源网站
    ///
    /// URL已存在时更新正文与抓取时间，否则插入新记录
    async fn create_website(
        &self,
        url: &str,
        content: Option<&str>,
    ) -> Result<Website, RepositoryError> {
        let existing = website::Entity::find()
            .filter(website::Column::Url.eq(url))
            .one(self.db.as_ref())
            .await?;

        let now = Utc::now();
        let model = match existing {
            Some(found) => {
                let mut active: website::ActiveModel = found.into();
                active.content = Set(content.map(str::to_string));
                active.last_scraped = Set(now.into());
                active.update(self.db.as_ref()).await?
            }
            None => {
                let active = website::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    url: Set(url.to_string()),
                    content: Set(content.map(str::to_string)),
                    last_scraped: Set(now.into()),
                };
                active.insert(self.db.as_ref()).await?
            }
        };

        Ok(model.into())
    }

    async fn bulk_create_questions(
        &self,
        website_id: Uuid,
        questions: &[QuestionItem],
    ) -> Result<(), RepositoryError> {
        website::Entity::find_by_id(website_id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if questions.is_empty() {
            return Ok(());
        }

        let mut question_models = Vec::with_capacity(questions.len());
        let mut option_models = Vec::new();
        for item in questions {
            let question_id = Uuid::new_v4();
            question_models.push(question::ActiveModel {
                id: Set(question_id),
                website_id: Set(website_id),
                text: Set(item.question.clone()),
            });
            for option in &item.options {
                option_models.push(question_option::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    question_id: Set(question_id),
                    text: Set(option.clone()),
                });
            }
        }

        question::Entity::insert_many(question_models)
            .exec(self.db.as_ref())
            .await?;
        if !option_models.is_empty() {
            question_option::Entity::insert_many(option_models)
                .exec(self.db.as_ref())
                .await?;
        }

        Ok(())
    }

    async fn find_questions_by_url(
        &self,
        url: &str,
    ) -> Result<Option<Vec<QuestionItem>>, RepositoryError> {
        let Some(found) = website::Entity::find()
            .filter(website::Column::Url.eq(url))
            .one(self.db.as_ref())
            .await?
        else {
            return Ok(None);
        };

        let rows = question::Entity::find()
            .filter(question::Column::WebsiteId.eq(found.id))
            .find_with_related(question_option::Entity)
            .all(self.db.as_ref())
            .await?;

        if rows.is_empty() {
            return Ok(None);
        }

        let items = rows
            .into_iter()
            .map(|(question, options)| QuestionItem {
                question: question.text,
                options: options.into_iter().map(|option| option.text).collect(),
            })
            .collect();

        Ok(Some(items))
    }
}

impl From<website::Model> for Website {
    fn from(model: website::Model) -> Self {
        Self {
            id: model.id,
            url: model.url,
            content: model.content,
            last_scraped: model.last_scraped.into(),
        }
    }
}
