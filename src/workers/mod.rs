// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作者模块
pub mod manager;
pub mod pipeline_worker;

pub use manager::WorkerManager;
pub use pipeline_worker::PipelineWorker;
