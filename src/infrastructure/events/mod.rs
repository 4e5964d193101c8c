// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod session_channel;

pub use session_channel::{EventChannel, EventStream, InMemoryEventChannel, RedisEventChannel};
