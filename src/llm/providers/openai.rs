//! OpenAI and OpenAI-compatible provider client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::llm::{CompletionRequest, LlmClient, LlmSettings, Provider};

use super::REQUEST_TIMEOUT_SECS;

/// OpenAI-compatible chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    settings: LlmSettings,
    client: Client,
}

impl OpenAiClient {
    /// Create a new OpenAI client.
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
            "{}/v1/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String> {
        let temperature = req.temperature.unwrap_or(self.settings.temperature);
        let max_tokens = req.max_tokens.unwrap_or(self.settings.max_tokens);

        let mut body = serde_json::json!({
            "model": self.settings.model,
            "messages": [
                { "role": "system", "content": req.system },
                { "role": "user", "content": req.user },
            ],
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        if req.json_mode {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        let mut request = self.client.post(self.api_url()).json(&body);
        if let Some(ref api_key) = self.settings.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({status}): {text}");
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            anyhow::bail!("OpenAI returned empty content");
        }
        Ok(content)
    }

    fn provider(&self) -> Provider {
        self.settings.provider
    }
}

/// Non-streaming chat-completions response.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
