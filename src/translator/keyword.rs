//! Offline keyword translator
//!
//! A crude phrase matcher for demos and for running without an API key. It
//! emits the same wire JSON as the model would, so its output still goes
//! through parsing and validation. Portuguese and English phrasings are
//! recognised.

use async_trait::async_trait;
use serde_json::json;

use crate::core::DispatchError;
use crate::translator::Translator;

const NAVIGATE_PHRASES: &[&str] = &[
    "navegar para",
    "ir para",
    "vá para",
    "va para",
    "navigate to",
    "go to",
    "open",
];
const CLICK_WORDS: &[&str] = &["clicar", "clique", "aperte", "click", "press"];
const FILL_WORDS: &[&str] = &["preencher", "preencha", "fill"];
const FILL_SEPARATORS: &[&str] = &["com", "with"];
const CONTENT_PHRASES: &[&str] = &[
    "o que estou vendo",
    "resumo da página",
    "resumo da pagina",
    "what am i looking at",
    "summarize",
    "summary of the page",
];
const BUTTON_WORDS: &[&str] = &["botão", "botao", "button"];

/// Phrase-matching translator that needs no network or key
#[derive(Debug, Clone, Default)]
pub struct KeywordTranslator;

impl KeywordTranslator {
    pub fn new() -> Self {
        Self
    }

    /// The wire object for `command`
    pub fn match_command(&self, command: &str) -> serde_json::Value {
        let lower = command.to_lowercase();
        let words: Vec<&str> = command.split_whitespace().collect();

        if NAVIGATE_PHRASES.iter().any(|p| lower.contains(p)) {
            if let Some(url) = find_url(&words) {
                return json!({ "action": "NAVIGATE", "value": url });
            }
        }

        if let Some(pos) = position_of(&words, CLICK_WORDS) {
            let target = words[pos + 1..].join(" ").to_lowercase();
            let selector = if BUTTON_WORDS.iter().any(|w| target.contains(w)) {
                "button"
            } else {
                "a"
            };
            return json!({ "action": "CLICK", "value": selector });
        }

        if let Some(start) = position_of(&words, FILL_WORDS) {
            if let Some(offset) = position_of(&words[start + 1..], FILL_SEPARATORS) {
                let text = words[start + 2 + offset..].join(" ");
                if !text.is_empty() {
                    return json!({
                        "action": "FILL_FORM",
                        "value": { "selector": "input[type=\"text\"]", "text": text }
                    });
                }
            }
        }

        if CONTENT_PHRASES.iter().any(|p| lower.contains(p)) {
            return json!({ "action": "GET_CONTENT", "value": null });
        }

        json!({
            "action": "SAY",
            "value": format!(
                "Understood: \"{}\". For now I can only navigate, click, fill forms or summarize the page.",
                command.trim()
            )
        })
    }
}

fn position_of(words: &[&str], candidates: &[&str]) -> Option<usize> {
    words
        .iter()
        .position(|w| candidates.iter().any(|c| w.eq_ignore_ascii_case(c)))
}

/// First `http(s)://` or `www.` token; bare `www.` gets `https://`.
fn find_url(words: &[&str]) -> Option<String> {
    words.iter().find_map(|word| {
        let word = word.trim_end_matches(|c: char| matches!(c, '.' | ',' | '!' | '?'));
        let lower = word.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Some(word.to_string())
        } else if lower.starts_with("www.") {
            Some(format!("https://{}", word))
        } else {
            None
        }
    })
}

#[async_trait]
impl Translator for KeywordTranslator {
    async fn translate(
        &self,
        command: &str,
        _api_key: Option<&str>,
    ) -> Result<String, DispatchError> {
        Ok(self.match_command(command).to_string())
    }

    fn requires_credential(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "keyword"
    }
}
