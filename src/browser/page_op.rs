//! Page operations and the values they send back
//!
//! Each operation renders into a self-contained script. Its only input is the
//! JSON argument spliced into the call, and its only output is one
//! `JSON.stringify`'d value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::DispatchError;

const CLICK_FN: &str = r#"function (selector) {
  const element = document.querySelector(selector);
  if (!element) {
    return JSON.stringify({ found: false });
  }
  element.click();
  return JSON.stringify({ found: true });
}"#;

const FILL_FN: &str = r#"function (data) {
  const element = document.querySelector(data.selector);
  if (!element) {
    return JSON.stringify({ found: false });
  }
  element.value = data.text;
  element.dispatchEvent(new Event('input', { bubbles: true }));
  element.dispatchEvent(new Event('change', { bubbles: true }));
  return JSON.stringify({ found: true });
}"#;

const SUMMARIZE_FN: &str = r#"function () {
  return JSON.stringify({
    title: document.title,
    paragraphs: document.querySelectorAll('p').length,
    links: document.querySelectorAll('a').length,
  });
}"#;

/// An operation run inside the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOp {
    Click { selector: String },
    Fill { selector: String, text: String },
    Summarize,
}

impl PageOp {
    pub fn name(&self) -> &'static str {
        match self {
            PageOp::Click { .. } => "click",
            PageOp::Fill { .. } => "fill",
            PageOp::Summarize => "summarize",
        }
    }

    /// The single argument passed across the boundary
    pub fn argument(&self) -> Option<Value> {
        match self {
            PageOp::Click { selector } => Some(json!(selector)),
            PageOp::Fill { selector, text } => Some(json!({ "selector": selector, "text": text })),
            PageOp::Summarize => None,
        }
    }

    /// Script source: the page function applied to its JSON argument
    pub fn script(&self) -> String {
        let function = match self {
            PageOp::Click { .. } => CLICK_FN,
            PageOp::Fill { .. } => FILL_FN,
            PageOp::Summarize => SUMMARIZE_FN,
        };
        let argument = self.argument().map(|a| a.to_string()).unwrap_or_default();
        format!("({})({})", function, argument)
    }
}

/// Result of the click and fill operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementResult {
    pub found: bool,
}

/// Result of the summarize operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub title: String,
    pub paragraphs: usize,
    pub links: usize,
}

/// Decode what came back across the boundary.
///
/// The page stringifies its result, so a JSON string is parsed once more.
/// `null` means the operation produced nothing.
pub fn decode<T: DeserializeOwned>(op: &PageOp, value: Value) -> Result<T, DispatchError> {
    let value = match value {
        Value::Null => {
            return Err(DispatchError::fault(format!(
                "{} returned no result",
                op.name()
            )))
        }
        Value::String(text) => serde_json::from_str(&text).map_err(|e| {
            DispatchError::fault(format!("{} returned unreadable result: {}", op.name(), e))
        })?,
        other => other,
    };

    serde_json::from_value(value).map_err(|e| {
        DispatchError::fault(format!("{} returned unexpected result: {}", op.name(), e))
    })
}
