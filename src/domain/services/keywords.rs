// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 关键词提取模块
//!
//! RAKE（Rapid Automatic Keyword Extraction）风格的短语打分：
//! 文本按停用词与句间标点切分为候选短语，词按度/频比打分，
//! 短语得分为成员词得分之和。重复短语只计一次

use std::collections::HashMap;

/// 英文停用词表
///
/// 覆盖常见功能词即可，提取质量对长尾停用词不敏感
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "below", "between", "both", "but", "by", "can", "did",
    "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further", "had",
    "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if", "in",
    "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor", "not", "now",
    "of", "off", "on", "once", "only", "or", "other", "our", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "this", "those", "through", "to", "too", "under", "until", "up", "very",
    "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "would", "you", "your", "yours",
];

fn is_stopword(word: &str) -> bool {
    STOPWORDS.binary_search(&word).is_ok()
}

fn is_phrase_boundary(ch: char) -> bool {
    matches!(ch, '.' | ',' | ';' | ':' | '!' | '?' | '(' | ')' | '[' | ']' | '"' | '…' | '|')
}

/// 将文本切分为候选短语（小写词序列）
fn candidate_phrases(text: &str) -> Vec<Vec<String>> {
    let mut phrases = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for token in text.split(|ch: char| ch.is_whitespace() || is_phrase_boundary(ch)) {
        let word: String = token
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '\'')
            .collect::<String>()
            .to_lowercase();

        if word.is_empty() || is_stopword(&word) {
            if !current.is_empty() {
                phrases.push(std::mem::take(&mut current));
            }
        } else {
            current.push(word);
        }
    }
    if !current.is_empty() {
        phrases.push(current);
    }

    phrases
}

/// 提取排名前limit的关键短语及其得分
///
/// # 参数
///
/// * `text` - 输入文本
/// * `limit` - 返回的短语数量上限
///
/// # 返回值
///
/// 按得分降序的（短语, 得分）列表
pub fn extract_keywords(text: &str, limit: usize) -> Vec<(String, f64)> {
    let phrases = candidate_phrases(text);

    let mut frequency: HashMap<&str, f64> = HashMap::new();
    let mut degree: HashMap<&str, f64> = HashMap::new();

    for phrase in &phrases {
        let co_occurrence = (phrase.len() - 1) as f64;
        for word in phrase {
            *frequency.entry(word).or_default() += 1.0;
            *degree.entry(word).or_default() += co_occurrence + 1.0;
        }
    }

    let mut scored: HashMap<String, f64> = HashMap::new();
    for phrase in &phrases {
        let joined = phrase.join(" ");
        if scored.contains_key(&joined) {
            // 重复短语只计一次
            continue;
        }
        let score: f64 = phrase
            .iter()
            .map(|word| degree[word.as_str()] / frequency[word.as_str()])
            .sum();
        scored.insert(joined, score);
    }

    let mut ranked: Vec<(String, f64)> = scored.into_iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(limit);
    ranked
}
