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

use std::num::NonZeroUsize;

use lru::LruCache;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use thiserror::Error;
use url::Url;

/// 验证错误类型
#[derive(Error, Debug)]
pub enum ValidationError {
    /// URL无效
    #[error("Invalid URL provided")]
    InvalidUrl,
}

/// 非文本资源扩展名黑名单
const NON_TEXT_EXTENSIONS: &[&str] = &[".pdf", ".jpg", ".png", ".gif"];

/// 判定结果缓存
///
/// 判定函数为纯函数，可按字符串精确记忆化
static SCOPE_CACHE: Lazy<Mutex<LruCache<(String, String), bool>>> =
    Lazy::new(|| Mutex::new(LruCache::new(NonZeroUsize::new(100).unwrap())));

/// 判断候选URL是否在以origin为根的爬取范围内
///
/// 以下情况判定为范围外（解析失败时封闭处理，不向调用方抛错）：
/// - 候选URL的authority与origin不同
/// - 协议不是http/https
/// - 路径以非文本扩展名结尾
///
/// # 参数
///
/// * `candidate` - 候选URL
/// * `origin` - 爬取根的authority（scheme+host）
///
/// # 返回值
///
/// 候选URL在范围内时返回true
pub fn is_in_scope(candidate: &str, origin: &str) -> bool {
    let key = (candidate.to_string(), origin.to_string());
    if let Some(cached) = SCOPE_CACHE.lock().get(&key) {
        return *cached;
    }

    let result = check_in_scope(candidate, origin);
    SCOPE_CACHE.lock().put(key, result);
    result
}

fn check_in_scope(candidate: &str, origin: &str) -> bool {
    let parsed = match Url::parse(candidate) {
        Ok(u) => u,
        Err(_) => return false,
    };
    let origin_url = match Url::parse(origin) {
        Ok(u) => u,
        Err(_) => return false,
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }

    if parsed.host_str() != origin_url.host_str()
        || parsed.port_or_known_default() != origin_url.port_or_known_default()
    {
        return false;
    }

    let path = parsed.path().to_lowercase();
    if NON_TEXT_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return false;
    }

    true
}

/// 从URL提取爬取根的authority
///
/// # 参数
///
/// * `url` - 种子URL
///
/// # 返回值
///
/// * `Ok(String)` - scheme+authority形式的origin
/// * `Err(ValidationError)` - URL无效或协议不支持
pub fn origin_of(url: &str) -> Result<String, ValidationError> {
    let parsed = Url::parse(url).map_err(|_| ValidationError::InvalidUrl)?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ValidationError::InvalidUrl);
    }

    let host = parsed.host_str().ok_or(ValidationError::InvalidUrl)?;
    let origin = match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    };
    Ok(origin)
}
