// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 内容生成请求参数
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateContentQuery {
    /// 待处理的网站URL
    #[validate(url(message = "Invalid URL provided"))]
    pub url: String,
}

/// 内容生成响应
///
/// links包含抽样得到的站内链接以及种子URL自身
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    pub session_id: String,
    pub links: Vec<String>,
}

/// 预览图请求参数
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PreviewQuery {
    #[validate(url(message = "Invalid URL provided"))]
    pub url: String,
}

/// 预览图响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub image_url: String,
}
