//! Anthropic Claude API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::llm::{CompletionRequest, LlmClient, LlmSettings, Provider};

use super::REQUEST_TIMEOUT_SECS;

/// Anthropic messages API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Claude API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    settings: LlmSettings,
    client: Client,
}

impl AnthropicClient {
    /// Create a new Anthropic client.
    pub fn new(settings: LlmSettings) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self { settings, client }
    }

    /// Build the API URL.
    fn api_url(&self) -> String {
        format!(
            "{}/v1/messages",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String> {
        let temperature = req.temperature.unwrap_or(self.settings.temperature);
        let max_tokens = req.max_tokens.unwrap_or(self.settings.max_tokens);

        // The messages API has no JSON response mode; the format instruction in
        // the system prompt has to carry that weight.
        let body = serde_json::json!({
            "model": self.settings.model,
            "system": req.system,
            "messages": [
                { "role": "user", "content": req.user },
            ],
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        let mut request = self
            .client
            .post(self.api_url())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);
        if let Some(ref api_key) = self.settings.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error ({status}): {text}");
        }

        let message: MessagesResponse = response.json().await?;
        let content: String = message
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect();

        if content.trim().is_empty() {
            anyhow::bail!("Anthropic returned empty content");
        }
        Ok(content)
    }

    fn provider(&self) -> Provider {
        self.settings.provider
    }
}

/// Non-streaming messages API response.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing_joins_text_blocks() {
        let raw = r#"{"content":[{"type":"text","text":"hello "},{"type":"text","text":"world"}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).expect("parse");
        let text: String = parsed
            .content
            .into_iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect();
        assert_eq!(text, "hello world");
    }
}
