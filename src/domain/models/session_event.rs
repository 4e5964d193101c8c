// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::{Deserialize, Serialize};

use crate::domain::models::question::QuestionItem;

/// 会话事件
///
/// 每个会话的事件序列满足：零或多条Payload，随后恰好一条终止事件
/// （Complete或Error），终止事件之后不再有任何事件。
///
/// 线格式与消费端约定一致：
/// - Payload: `{"link": "...", "questions": [...]}`
/// - Complete: `{"status": "complete"}`
/// - Error: `{"status": "error", "error": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionEvent {
    /// 问题载荷事件
    Payload {
        link: String,
        questions: Vec<QuestionItem>,
    },
    /// 错误终止事件
    Error { status: ErrorTag, error: String },
    /// 正常终止事件
    Complete { status: CompleteTag },
}

/// Complete事件的status字面量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompleteTag {
    #[serde(rename = "complete")]
    Complete,
}

/// Error事件的status字面量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorTag {
    #[serde(rename = "error")]
    Error,
}

impl SessionEvent {
    pub fn payload(link: impl Into<String>, questions: Vec<QuestionItem>) -> Self {
        Self::Payload {
            link: link.into(),
            questions,
        }
    }

    pub fn complete() -> Self {
        Self::Complete {
            status: CompleteTag::Complete,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            status: ErrorTag::Error,
            error: message.into(),
        }
    }

    /// 是否为终止事件
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}
