// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod generate_content;
pub mod preview_image;
pub mod process_crawl;

pub use generate_content::{GenerateContentUseCase, TriggerError};
pub use preview_image::PreviewImageUseCase;
pub use process_crawl::ProcessCrawlUseCase;
