// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod generate_request;

pub use generate_request::{GenerateContentQuery, GenerateContentResponse, PreviewQuery, PreviewResponse};
