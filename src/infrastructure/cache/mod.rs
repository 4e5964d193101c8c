// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod content_cache;
pub mod redis_client;

pub use content_cache::{CacheStore, ContentCache, InMemoryCacheStore};
pub use redis_client::RedisClient;
