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

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;

/// 预览截图渲染器特质
#[async_trait]
pub trait PreviewRenderer: Send + Sync {
    /// 渲染指定页面的预览截图
    ///
    /// # 参数
    ///
    /// * `url` - 目标页面URL
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<u8>)` - PNG图像字节
    /// * `Err(anyhow::Error)` - 渲染过程中出现的错误
    async fn render(&self, url: &str) -> Result<Vec<u8>>;
}

/// 基于外部渲染服务的截图引擎
///
/// 将截图请求转发给独立的浏览器渲染服务，由其返回PNG字节
pub struct HttpScreenshotRenderer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpScreenshotRenderer {
    /// 创建新的截图引擎实例
    ///
    /// # 参数
    ///
    /// * `endpoint` - 渲染服务地址
    /// * `timeout` - 单次渲染超时时间
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl PreviewRenderer for HttpScreenshotRenderer {
    async fn render(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "url": url, "format": "png" }))
            .send()
            .await
            .context("screenshot render request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("screenshot render service returned {}", status);
        }

        let bytes = response
            .bytes()
            .await
            .context("failed to read rendered screenshot")?;
        Ok(bytes.to_vec())
    }
}
