//! LLM client abstractions and provider implementations.
//!
//! The [`LlmClient`] trait defines the single-completion interface the topic
//! generator and report generator depend on. Concrete drivers live in
//! [`providers`]:
//!
//! - [`providers::OpenAiClient`]: OpenAI and compatible chat-completions APIs
//! - [`providers::AnthropicClient`]: Anthropic messages API
//!
//! The service never streams; every call is a request/response completion.

pub mod providers;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// LLM connection and model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Base URL for the LLM API.
    pub base_url: String,
    /// API key for authentication.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// Provider type.
    pub provider: Provider,
    /// Default maximum tokens to generate.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Default sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: Provider::OpenAi.default_base_url().to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            provider: Provider::OpenAi,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI and compatible APIs.
    #[default]
    OpenAi,
    /// Anthropic Claude.
    Anthropic,
    /// Custom/unknown provider (OpenAI wire format assumed).
    Custom,
}

impl Provider {
    /// Get the default base URL for this provider.
    #[must_use]
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com",
            Self::Anthropic => "https://api.anthropic.com",
            Self::Custom => "",
        }
    }
}

/// A single completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction.
    pub system: String,
    /// User message.
    pub user: String,
    /// Temperature override; falls back to the client settings.
    pub temperature: Option<f32>,
    /// Max tokens override; falls back to the client settings.
    pub max_tokens: Option<u32>,
    /// Request a JSON object response where the provider supports it.
    pub json_mode: bool,
}

impl CompletionRequest {
    /// Create a request with a system instruction and user message.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: None,
            max_tokens: None,
            json_mode: false,
        }
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the response length.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Ask for a JSON object response.
    #[must_use]
    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// Trait for non-streaming LLM completion clients.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one completion and return the response text.
    ///
    /// An empty response is an error; callers never have to re-check.
    async fn complete(&self, req: CompletionRequest) -> anyhow::Result<String>;

    /// Get the provider type.
    fn provider(&self) -> Provider;
}

/// Build the client matching the configured provider.
#[must_use]
pub fn client_from_settings(settings: LlmSettings) -> Arc<dyn LlmClient> {
    match settings.provider {
        Provider::Anthropic => Arc::new(providers::AnthropicClient::new(settings)),
        Provider::OpenAi | Provider::Custom => Arc::new(providers::OpenAiClient::new(settings)),
    }
}
