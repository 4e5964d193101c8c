// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 文本清洗模块
//!
//! 提供网页可见文本的规范化处理：
//! - 任意空白串（空格、制表符、换行）折叠为单个空格
//! - 去除首尾空白
//!
//! 规范化是幂等的：`normalize(normalize(x)) == normalize(x)`

/// 规范化原始文本
///
/// # 参数
///
/// * `raw` - 原始提取文本
///
/// # 返回值
///
/// 清洗后的文本
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_whitespace = false;

    for ch in raw.chars() {
        if ch.is_whitespace() {
            in_whitespace = true;
        } else {
            if in_whitespace && !out.is_empty() {
                out.push(' ');
            }
            in_whitespace = false;
            out.push(ch);
        }
    }

    out
}
