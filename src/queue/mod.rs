// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
pub mod task_queue;

pub use task_queue::{InMemoryTaskQueue, PipelineTask, QueueError, TaskQueue};
