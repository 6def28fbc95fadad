//! LLM summarization.
//!
//! One-shot, non-streaming call against an OpenAI-compatible
//! chat-completions endpoint, used to produce a short summary of a finished
//! transcript.

use crate::config::Config;
use crate::Result;
use anyhow::{bail, Context};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const DEFAULT_PROMPT: &str = "请用简体中文总结这段视频字幕的主要内容，控制在两百字以内。";

pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

fn extract_content(value: &serde_json::Value) -> Option<&str> {
    value
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

impl LlmClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.llm.api_key.is_empty() {
            bail!("LLM API key is not configured; set llm.api_key in the config file");
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .build()
            .context("Failed to build LLM client")?;
        Ok(Self {
            client,
            base_url: config.llm.endpoint.trim_end_matches('/').to_string(),
            api_key: config.llm.api_key.clone(),
            model: config.llm.model.clone(),
        })
    }

    /// Summarize a transcript. `prompt` overrides the default instruction.
    pub async fn summarize(
        &self,
        title: &str,
        transcript: &str,
        prompt: Option<&str>,
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let instruction = prompt.unwrap_or(DEFAULT_PROMPT);
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": instruction},
                {"role": "user", "content": format!("视频标题：{}\n\n字幕内容：\n{}", title, transcript)}
            ],
            "max_tokens": 1024
        });

        debug!("POST {} (model {})", url, self.model);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        let text = response.text().await.context("Failed to read LLM response")?;
        if !status.is_success() {
            let message = extract_error_message(&text)
                .unwrap_or_else(|| text.chars().take(200).collect());
            bail!("LLM endpoint answered HTTP {}: {}", status, message);
        }

        let value: serde_json::Value =
            serde_json::from_str(&text).context("LLM endpoint returned malformed JSON")?;
        let content = extract_content(&value).context("LLM response carried no message content")?;
        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content() {
        let value = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "视频讲了猫"}}
            ]
        });
        assert_eq!(extract_content(&value), Some("视频讲了猫"));
        assert_eq!(extract_content(&json!({"choices": []})), None);
        assert_eq!(extract_content(&json!({})), None);
    }

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error": {"message": "Invalid API key", "type": "auth"}}"#;
        assert_eq!(
            extract_error_message(body).as_deref(),
            Some("Invalid API key")
        );
        assert_eq!(extract_error_message("not json"), None);
        assert_eq!(extract_error_message(r#"{"detail": "nope"}"#), None);
    }
}
