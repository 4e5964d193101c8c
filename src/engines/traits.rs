// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("非成功状态码: {0}")]
    Status(u16),
}

/// 单页抓取结果
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    /// 规范化后的可见文本
    pub text: String,
    /// 发现的站内链接（仅在请求提取链接时非空）
    pub links: HashSet<String>,
}

/// 单页抓取引擎特质
///
/// 实现方负责超时控制与内容提取；并发许可由爬虫在调用前获取
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取单个页面
    ///
    /// # 参数
    ///
    /// * `url` - 页面URL
    /// * `origin` - 爬取根的authority，用于链接范围过滤
    /// * `extract_links` - 是否提取超链接
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedPage)` - 抓取结果
    /// * `Err(FetchError)` - 网络、超时或解析错误
    async fn fetch(
        &self,
        url: &str,
        origin: &str,
        extract_links: bool,
    ) -> Result<FetchedPage, FetchError>;
}
