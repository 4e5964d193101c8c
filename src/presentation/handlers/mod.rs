// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod content_handler;
pub mod preview_handler;
pub mod stream_handler;
