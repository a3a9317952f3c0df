//! Chat backend seam used by the translator

use async_trait::async_trait;

use crate::core::{Message, Result};

/// One completed chat turn
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// Assistant text, trimmed
    pub content: String,
    pub usage: Option<TokenUsage>,
    /// Model name echoed by the backend
    pub model: String,
}

/// Token counts reported by the backend
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Options for a chat request
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Temperature for sampling (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Ask the backend to emit a single JSON object
    pub json_object: bool,
}

impl GenerateOptions {
    /// Options requesting JSON-only output
    pub fn json() -> Self {
        Self {
            json_object: true,
            ..Self::default()
        }
    }
}

/// A backend that answers a list of messages with one reply
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generate a response from messages, authenticated with `api_key`
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        api_key: &str,
        options: Option<GenerateOptions>,
    ) -> Result<LLMResponse>;

    /// Short name for logs and `status`
    fn name(&self) -> &str;
}
