// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 引擎模块
///
/// 实现单页抓取引擎与预览截图引擎
pub mod reqwest_engine;
pub mod screenshot;
pub mod traits;

pub use reqwest_engine::ReqwestFetcher;
pub use screenshot::{HttpScreenshotRenderer, PreviewRenderer};
pub use traits::{FetchError, FetchedPage, PageFetcher};
