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

use axum::extract::{Extension, Json, Query};
use std::sync::Arc;
use validator::Validate;

use crate::application::dto::{GenerateContentQuery, GenerateContentResponse};
use crate::application::use_cases::generate_content::GenerateContentUseCase;
use crate::presentation::errors::AppError;

/// 内容生成触发端点
///
/// 校验URL后同步返回会话ID与链接列表，问题生成在后台管道中进行
pub async fn generate_content(
    Extension(use_case): Extension<Arc<GenerateContentUseCase>>,
    Query(query): Query<GenerateContentQuery>,
) -> Result<Json<GenerateContentResponse>, AppError> {
    query.validate()?;
    let response = use_case.execute(&query.url).await?;
    Ok(Json(response))
}
