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

use crate::application::dto::{PreviewQuery, PreviewResponse};
use crate::application::use_cases::preview_image::PreviewImageUseCase;
use crate::presentation::errors::AppError;

/// 页面预览图端点
pub async fn preview_image(
    Extension(use_case): Extension<Arc<PreviewImageUseCase>>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<PreviewResponse>, AppError> {
    query.validate()?;
    let image_url = use_case.execute(&query.url).await?;
    Ok(Json(PreviewResponse { image_url }))
}
