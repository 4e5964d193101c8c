// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 生成的调查问题
///
/// 下游生成器的输出单元，同时也是缓存与持久化的载荷格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionItem {
    /// 问题文本
    pub question: String,
    /// 候选选项
    #[serde(default)]
    pub options: Vec<String>,
}
