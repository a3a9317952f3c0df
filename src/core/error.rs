//! Custom error types for Forseti
//!
//! `ForsetiError` covers infrastructure failures (config, subprocess, HTTP).
//! `DispatchError` is the per-command taxonomy; every variant turns into a
//! reply sentence and never escapes the dispatcher.

use thiserror::Error;

/// Main error type for Forseti infrastructure
#[derive(Error, Debug)]
pub enum ForsetiError {
    /// Chat API answered with an error status
    #[error("Provider error: {0}")]
    Provider(String),

    /// Chat API answered 2xx with a body we could not use
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// Browser automation errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Agent-browser not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,
}

/// Convenience Result type for Forseti operations
pub type Result<T> = std::result::Result<T, ForsetiError>;

impl ForsetiError {
    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Reply sent when no API key is configured.
pub const MISSING_CREDENTIAL_REPLY: &str =
    "Error: API key not configured. Please configure the API key.";

/// Reply sent when the translation service returns something that is not an action.
pub const INVALID_FORMAT_REPLY: &str = "Error: the AI returned an invalid action format.";

/// Reply sent when a page operation faults.
pub const EXECUTION_FAULT_REPLY: &str = "Error: the page operation could not be executed.";

/// Failure of a single command somewhere in the dispatch pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No API key configured
    #[error("API key not configured")]
    MissingCredential,

    /// The translation service could not be reached or answered with an error status
    #[error("translation transport error: {0}")]
    TranslationTransport(String),

    /// The translation service answered with something that is not JSON
    #[error("translation format error: {0}")]
    TranslationFormat(String),

    /// Missing `action`, or one outside the five kinds
    #[error("unknown action: {}", .0.as_deref().unwrap_or("<missing>"))]
    UnknownAction(Option<String>),

    /// `value` does not match the shape its kind requires
    #[error("malformed value for '{field}': {reason}")]
    MalformedValue { field: String, reason: String },

    /// The tab refused or failed to navigate
    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    /// No focused tab to run against
    #[error("no active tab")]
    NoActiveTab,

    /// The isolated page operation raised, crashed or returned nothing
    #[error("execution fault: {0}")]
    ExecutionFault(String),
}

impl DispatchError {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn fault(msg: impl Into<String>) -> Self {
        Self::ExecutionFault(msg.into())
    }

    /// The user-facing sentence for this failure
    pub fn reply(&self) -> String {
        match self {
            Self::MissingCredential => MISSING_CREDENTIAL_REPLY.to_string(),
            Self::TranslationTransport(msg) => {
                format!("Error communicating with the translation service: {}", msg)
            }
            Self::TranslationFormat(_) => INVALID_FORMAT_REPLY.to_string(),
            Self::UnknownAction(Some(kind)) => format!("Error: unknown action '{}'.", kind),
            Self::UnknownAction(None) => {
                "Error: the AI response did not name an action.".to_string()
            }
            Self::MalformedValue { field, reason } => {
                format!("Error: invalid value for '{}': {}.", field, reason)
            }
            Self::NavigationFailed(msg) => format!("Error navigating: {}", msg),
            Self::NoActiveTab => "No active tab found.".to_string(),
            Self::ExecutionFault(_) => EXECUTION_FAULT_REPLY.to_string(),
        }
    }
}
