// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::env;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::domain::models::crawl::CrawlResult;
use crate::domain::models::question::QuestionItem;
use crate::domain::services::keywords;

/// 种子页关键词数量
const MAIN_PAGE_KEYWORDS: usize = 10;
/// 每个子链接关键词数量
const SUBLINK_KEYWORDS: usize = 5;
/// 送入提示词的正文长度上限
const MAX_PROMPT_TEXT: usize = 10000;

/// 站点分析结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteAnalysis {
    pub topics: Vec<String>,
    pub industry: Vec<String>,
    pub target_audience: String,
}

#[async_trait]
pub trait QuestionGeneratorTrait: Send + Sync {
    /// 由爬取输出生成调查问题，可能返回空列表
    async fn generate_questions(&self, crawl: &CrawlResult) -> Result<Vec<QuestionItem>>;
}

/// 问题生成服务 - 处理与LLM提供商的交互
///
/// # 功能
///
/// 基于爬取文本的关键词与站点分析，生成用于访客分类的多选问题
///
/// # 配置
///
/// 通过环境变量进行配置：
/// - `LLM_API_KEY` - LLM API密钥
/// - `LLM_MODEL` - 使用的模型名称（默认为 gpt-3.5-turbo）
/// - `LLM_API_BASE_URL` - LLM API基础URL
pub struct LlmQuestionGenerator {
    api_key: Option<String>,
    model: String,
    api_base_url: String,
    client: reqwest::Client,
}

impl Default for LlmQuestionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmQuestionGenerator {
    pub fn new() -> Self {
        Self {
            api_key: env::var("LLM_API_KEY").ok(),
            model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            api_base_url: env::var("LLM_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            client: reqwest::Client::new(),
        }
    }

    pub fn new_with_config(api_key: Option<String>, model: String, api_base_url: String) -> Self {
        Self {
            api_key,
            model,
            api_base_url,
            client: reqwest::Client::new(),
        }
    }

    /// 调用chat completions接口并返回首个回复内容
    async fn chat_completion(&self, system: &str, user: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("LLM API key not configured"))?;

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "temperature": 1,
            "top_p": 0.9,
            "response_format": { "type": "json_object" }
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("LLM request failed")?;

        let payload: Value = response
            .json()
            .await
            .context("LLM response is not valid JSON")?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("LLM response missing content"))?;

        Ok(content.to_string())
    }

    /// 分析站点主题、行业与目标受众
    async fn analyze(&self, main_text: &str, keyword_summary: &str) -> Result<SiteAnalysis> {
        let truncated: String = main_text.chars().take(MAX_PROMPT_TEXT).collect();
        let prompt = format!(
            "Analyze this website main content and its sublinks with their keywords and \
             identify the main topics, industry, and target audience. Respond with a JSON \
             object with keys \"topics\" (array of strings), \"industry\" (array of strings) \
             and \"target_audience\" (string).\nmain content: {}\nkeywords: {}",
            truncated, keyword_summary
        );

        let content = self
            .chat_completion(
                "You are a helpful assistant that analyzes website content.",
                &prompt,
            )
            .await?;

        parse_json_content(&content).context("failed to parse site analysis")
    }
}

#[async_trait]
impl QuestionGeneratorTrait for LlmQuestionGenerator {
    async fn generate_questions(&self, crawl: &CrawlResult) -> Result<Vec<QuestionItem>> {
        let main_keywords = keywords::extract_keywords(&crawl.main_text, MAIN_PAGE_KEYWORDS);
        let sublink_keywords: Vec<(String, Vec<(String, f64)>)> = crawl
            .link_texts
            .iter()
            .map(|(link, text)| {
                (
                    link.clone(),
                    keywords::extract_keywords(text, SUBLINK_KEYWORDS),
                )
            })
            .collect();

        let keyword_summary = format_keywords(&main_keywords, &sublink_keywords);

        let analysis = self.analyze(&crawl.main_text, &keyword_summary).await?;
        debug!("Site analysis: {:?}", analysis);

        let prompt = format!(
            "Based on this website analysis: {}\nand its sublink keywords: {}\n\
             Generate FOUR (4) multiple choice questions that are very specific to this \
             website that would help categorize visitors. Respond with a JSON object with a \
             single key \"questions\" holding an array of objects, each with a \"question\" \
             string and an \"options\" array of strings.",
            serde_json::to_string(&analysis).unwrap_or_default(),
            keyword_summary
        );

        let content = self
            .chat_completion(
                "You are a helpful assistant that generates survey questions.",
                &prompt,
            )
            .await?;

        let parsed: QuestionsEnvelope =
            parse_json_content(&content).context("failed to parse generated questions")?;
        Ok(parsed.questions)
    }
}

#[derive(Debug, Deserialize)]
struct QuestionsEnvelope {
    questions: Vec<QuestionItem>,
}

/// 解析模型返回的JSON内容，容忍markdown代码栅栏
fn parse_json_content<T: serde::de::DeserializeOwned>(content: &str) -> Result<T> {
    let trimmed = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(trimmed).map_err(Into::into)
}

fn format_keywords(
    main_keywords: &[(String, f64)],
    sublink_keywords: &[(String, Vec<(String, f64)>)],
) -> String {
    let main: Vec<&str> = main_keywords.iter().map(|(k, _)| k.as_str()).collect();
    let subs: Vec<String> = sublink_keywords
        .iter()
        .map(|(link, kws)| {
            let words: Vec<&str> = kws.iter().map(|(k, _)| k.as_str()).collect();
            format!("{}: [{}]", link, words.join(", "))
        })
        .collect();
    format!(
        "main page keywords: [{}]; sublink keywords: {{{}}}",
        main.join(", "),
        subs.join("; ")
    )
}
