//! Translator module - natural language to raw action text
//!
//! A translator only produces text. `parse_candidate` turns that text into a
//! `RawCandidate`, which the validator then checks.

mod keyword;
mod prompt;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::{Config, DispatchError, ForsetiError, Message, ProviderType, RawCandidate};
use crate::llm::{ChatProvider, GenerateOptions, OpenAiClient};

pub use keyword::KeywordTranslator;
pub use prompt::SYSTEM_PROMPT;

/// Converts a command into the raw text of a candidate action
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `command`. `api_key` is `Some` whenever `requires_credential` is true.
    async fn translate(&self, command: &str, api_key: Option<&str>)
        -> Result<String, DispatchError>;

    /// Whether a key must be present before `translate` is called
    fn requires_credential(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

/// Translator backed by a chat model
pub struct LlmTranslator {
    provider: Arc<dyn ChatProvider>,
    model: String,
}

impl LlmTranslator {
    pub fn new(provider: Arc<dyn ChatProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// The translator used with an OpenAI-compatible endpoint
    pub fn from_config(config: &Config) -> crate::core::Result<Self> {
        let client = OpenAiClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), config.translator.model.clone()))
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(
        &self,
        command: &str,
        api_key: Option<&str>,
    ) -> Result<String, DispatchError> {
        let api_key = api_key.ok_or(DispatchError::MissingCredential)?;
        let messages = [Message::system(SYSTEM_PROMPT), Message::user(command)];

        let response = self
            .provider
            .chat(&self.model, &messages, api_key, Some(GenerateOptions::json()))
            .await
            .map_err(classify)?;

        tracing::debug!(content = %response.content, "translation received");
        Ok(response.content)
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}

/// Body problems are format errors; everything else is transport.
fn classify(err: ForsetiError) -> DispatchError {
    match err {
        ForsetiError::InvalidResponse(msg) => DispatchError::TranslationFormat(msg),
        ForsetiError::Json(e) => DispatchError::TranslationFormat(e.to_string()),
        ForsetiError::Provider(msg) => DispatchError::TranslationTransport(msg),
        other => DispatchError::TranslationTransport(other.to_string()),
    }
}

/// Build the translator selected in the configuration
pub fn create_translator(config: &Config) -> crate::core::Result<Arc<dyn Translator>> {
    let translator: Arc<dyn Translator> = match config.translator.provider {
        ProviderType::OpenAi => Arc::new(LlmTranslator::from_config(config)?),
        ProviderType::Keyword => Arc::new(KeywordTranslator::new()),
    };
    Ok(translator)
}

/// Parse translator text into a candidate.
///
/// A surrounding Markdown code fence is stripped; anything else that is not
/// JSON is a format error.
pub fn parse_candidate(text: &str) -> Result<RawCandidate, DispatchError> {
    let trimmed = strip_code_fence(text.trim());
    serde_json::from_str(trimmed).map_err(|e| {
        tracing::warn!(error = %e, text = %text, "translator returned non-JSON");
        DispatchError::TranslationFormat(e.to_string())
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    // drop an info string such as `json`
    let body = match body.find('\n') {
        Some(pos) if !body[..pos].trim_start().starts_with('{') => &body[pos + 1..],
        _ => body,
    };
    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Result as ForsetiResult;
    use crate::llm::LLMResponse;
    use std::sync::Mutex;

    struct ScriptedProvider {
        reply: Mutex<Option<ForsetiResult<LLMResponse>>>,
        seen: Mutex<Vec<(String, usize, bool)>>,
    }

    impl ScriptedProvider {
        fn new(reply: ForsetiResult<LLMResponse>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        async fn chat(
            &self,
            _model: &str,
            messages: &[Message],
            api_key: &str,
            options: Option<GenerateOptions>,
        ) -> ForsetiResult<LLMResponse> {
            self.seen.lock().unwrap().push((
                api_key.to_string(),
                messages.len(),
                options.map(|o| o.json_object).unwrap_or(false),
            ));
            self.reply.lock().unwrap().take().unwrap()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn content(text: &str) -> ForsetiResult<LLMResponse> {
        Ok(LLMResponse {
            content: text.to_string(),
            usage: None,
            model: "m".into(),
        })
    }

    #[test]
    fn test_parse_plain_and_fenced() {
        assert_eq!(
            parse_candidate(r#" {"action": "SAY", "value": "x"} "#).unwrap()["action"],
            "SAY"
        );
        let fenced = "```json\n{\"action\": \"GET_CONTENT\", \"value\": null}\n```";
        assert_eq!(parse_candidate(fenced).unwrap()["action"], "GET_CONTENT");
        let bare_fence = "```{\"action\": \"SAY\", \"value\": \"y\"}```";
        assert_eq!(parse_candidate(bare_fence).unwrap()["value"], "y");
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(matches!(
            parse_candidate("Sure! Here is the action: NAVIGATE"),
            Err(DispatchError::TranslationFormat(_))
        ));
        assert!(matches!(
            parse_candidate(""),
            Err(DispatchError::TranslationFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_llm_translator_sends_prompt_and_key() {
        let provider = Arc::new(ScriptedProvider::new(content(r#"{"action":"SAY","value":"oi"}"#)));
        let translator = LlmTranslator::new(provider.clone(), "gemini-2.5-flash");

        let text = translator.translate("diga oi", Some("sk-test")).await.unwrap();
        assert!(text.contains("SAY"));

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0], ("sk-test".to_string(), 2, true));
    }

    #[tokio::test]
    async fn test_llm_translator_classifies_errors() {
        let status = LlmTranslator::new(
            Arc::new(ScriptedProvider::new(Err(ForsetiError::provider("500 - boom")))),
            "m",
        );
        assert_eq!(
            status.translate("x", Some("k")).await,
            Err(DispatchError::TranslationTransport("500 - boom".into()))
        );

        let body = LlmTranslator::new(
            Arc::new(ScriptedProvider::new(Err(ForsetiError::InvalidResponse(
                "no content".into(),
            )))),
            "m",
        );
        assert!(matches!(
            body.translate("x", Some("k")).await,
            Err(DispatchError::TranslationFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_llm_translator_without_key() {
        let translator = LlmTranslator::new(Arc::new(ScriptedProvider::new(content("{}"))), "m");
        assert!(translator.requires_credential());
        assert_eq!(
            translator.translate("x", None).await,
            Err(DispatchError::MissingCredential)
        );
    }
}
