//! OpenAI-compatible chat completions client
//!
//! Works against any endpoint speaking the `/chat/completions` dialect,
//! including Gemini's OpenAI compatibility layer.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{Config, ForsetiError, Message, Result};
use crate::llm::traits::{ChatProvider, GenerateOptions, LLMResponse, TokenUsage};

/// OpenAI-compatible API client
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
}

/// Chat completions request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Chat completions response
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Backends differ in which counts they report
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiClient {
    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.translator.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.translator.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the completions endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request<'a>(
        model: &'a str,
        messages: &'a [Message],
        options: Option<GenerateOptions>,
    ) -> ChatRequest<'a> {
        let options = options.unwrap_or_default();
        ChatRequest {
            model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            response_format: options.json_object.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        }
    }

    /// `"<status> - <message>"`, falling back to the raw body
    fn status_error(status: reqwest::StatusCode, body: &str) -> ForsetiError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.trim().to_string());
        ForsetiError::provider(format!("{} - {}", status.as_u16(), message))
    }

    fn to_llm_response(response: ChatResponse) -> Result<LLMResponse> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ForsetiError::InvalidResponse("response has no message content".into()))?;

        Ok(LLMResponse {
            content: content.trim().to_string(),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            model: response.model,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiClient {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        api_key: &str,
        options: Option<GenerateOptions>,
    ) -> Result<LLMResponse> {
        let request = Self::build_request(model, messages, options);
        tracing::debug!(endpoint = %self.endpoint(), model, "sending chat request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, "chat request rejected");
            return Err(Self::status_error(status, &body));
        }

        let chat_response: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ForsetiError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let response = Self::to_llm_response(chat_response)?;
        if let Some(usage) = &response.usage {
            tracing::debug!(total_tokens = usage.total_tokens, "chat response received");
        }
        Ok(response)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
