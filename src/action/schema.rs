//! The closed set of browser actions and the value shape each one carries

use serde_json::json;
use std::fmt;

/// One of the five action kinds understood by the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Navigate,
    Click,
    FillForm,
    GetContent,
    Say,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::Navigate,
        ActionKind::Click,
        ActionKind::FillForm,
        ActionKind::GetContent,
        ActionKind::Say,
    ];

    /// Name used on the wire
    pub fn wire_name(self) -> &'static str {
        match self {
            ActionKind::Navigate => "NAVIGATE",
            ActionKind::Click => "CLICK",
            ActionKind::FillForm => "FILL_FORM",
            ActionKind::GetContent => "GET_CONTENT",
            ActionKind::Say => "SAY",
        }
    }

    /// Trimmed, case-insensitive lookup by wire name
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.wire_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// What `value` must look like for a given kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Non-empty absolute URL string
    Url,
    /// Non-empty CSS selector string
    Selector,
    /// `{selector: string, text: string}`
    FormFill,
    /// Absent or null; anything else is ignored
    Absent,
    /// Any string
    Text,
}

/// The value shape required by `kind`
pub fn expected_shape(kind: ActionKind) -> ValueShape {
    match kind {
        ActionKind::Navigate => ValueShape::Url,
        ActionKind::Click => ValueShape::Selector,
        ActionKind::FillForm => ValueShape::FormFill,
        ActionKind::GetContent => ValueShape::Absent,
        ActionKind::Say => ValueShape::Text,
    }
}

/// A validated action. Only the validator constructs these from translator output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate { url: String },
    Click { selector: String },
    FillForm { selector: String, text: String },
    GetContent,
    Say { text: String },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Navigate { .. } => ActionKind::Navigate,
            Action::Click { .. } => ActionKind::Click,
            Action::FillForm { .. } => ActionKind::FillForm,
            Action::GetContent => ActionKind::GetContent,
            Action::Say { .. } => ActionKind::Say,
        }
    }

    /// The `{action, value}` object exchanged with the translator
    pub fn to_wire(&self) -> serde_json::Value {
        let value = match self {
            Action::Navigate { url } => json!(url),
            Action::Click { selector } => json!(selector),
            Action::FillForm { selector, text } => json!({ "selector": selector, "text": text }),
            Action::GetContent => serde_json::Value::Null,
            Action::Say { text } => json!(text),
        };
        json!({ "action": self.kind().wire_name(), "value": value })
    }
}
