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

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::validators::{self, ValidationError};

/// 爬取目标
///
/// 构造后不可变。origin为范围判定使用的authority（scheme+host）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    seed_url: String,
    origin: String,
}

impl CrawlTarget {
    /// 从种子URL构造爬取目标
    ///
    /// # 参数
    ///
    /// * `seed_url` - 爬取起点URL
    ///
    /// # 返回值
    ///
    /// * `Ok(CrawlTarget)` - 爬取目标
    /// * `Err(ValidationError)` - URL无效
    pub fn new(seed_url: &str) -> Result<Self, ValidationError> {
        let origin = validators::origin_of(seed_url)?;
        Ok(Self {
            seed_url: seed_url.to_string(),
            origin,
        })
    }

    pub fn seed_url(&self) -> &str {
        &self.seed_url
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// 爬取结果
///
/// 在交付给任务分发器之前由爬虫独占持有，交付后所有权转移，爬虫不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    /// 种子URL
    pub seed_url: String,
    /// 种子页面规范化后的可见文本，为空表示爬取失败
    pub main_text: String,
    /// 抽样得到的站内链接，不包含种子URL
    pub sampled_links: HashSet<String>,
    /// 子链接到其文本的映射，键始终是sampled_links的子集
    pub link_texts: HashMap<String, String>,
}

impl CrawlResult {
    /// 构造空结果
    ///
    /// 用于links缓存命中路径：管道仍然需要一个爬取输出，
    /// 但没有新的页面文本
    pub fn empty(seed_url: &str) -> Self {
        Self {
            seed_url: seed_url.to_string(),
            main_text: String::new(),
            sampled_links: HashSet::new(),
            link_texts: HashMap::new(),
        }
    }

    /// 种子页面是否爬取失败
    pub fn seed_failed(&self) -> bool {
        self.main_text.is_empty()
    }
}

/// 会话
///
/// 每个触发请求创建一个，id是同步请求路径与异步管道/事件通道之间唯一的关联键。
/// 无持久化记录，生命周期即一次流式订阅
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
