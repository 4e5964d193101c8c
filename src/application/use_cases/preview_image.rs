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

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::domain::repositories::storage_repository::StorageRepository;
use crate::engines::screenshot::PreviewRenderer;
use crate::infrastructure::cache::ContentCache;

/// 预览图用例
///
/// 按URL渲染页面截图并上传到对象存储，结果URL缓存复用
pub struct PreviewImageUseCase {
    renderer: Arc<dyn PreviewRenderer>,
    storage: Arc<dyn StorageRepository>,
    cache: Arc<ContentCache>,
}

impl PreviewImageUseCase {
    /// 创建新的预览图用例
    pub fn new(
        renderer: Arc<dyn PreviewRenderer>,
        storage: Arc<dyn StorageRepository>,
        cache: Arc<ContentCache>,
    ) -> Self {
        Self {
            renderer,
            storage,
            cache,
        }
    }

    /// 获取页面预览图URL
    ///
    /// 缓存命中直接返回，否则渲染、上传、写缓存
    #[instrument(skip(self))]
    pub async fn execute(&self, url: &str) -> Result<String> {
        if let Some(cached) = self.cache.get_preview(url).await? {
            info!("Preview cache hit for {}", url);
            return Ok(cached);
        }

        let image = self
            .renderer
            .render(url)
            .await
            .context("failed to render preview")?;
        let key = format!("previews/{}.png", slug_of(url));
        let image_url = self
            .storage
            .save(&key, &image)
            .await
            .context("failed to store preview")?;

        self.cache.set_preview(url, &image_url).await?;
        Ok(image_url)
    }
}

/// 从URL派生存储键片段
fn slug_of(url: &str) -> String {
    url.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}
