// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod website_repo_impl;

pub use website_repo_impl::WebsiteRepoImpl;
