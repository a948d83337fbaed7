//! LLM provider implementations.

mod anthropic;
mod openai;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

/// Request timeout applied to every provider HTTP client.
pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 120;
