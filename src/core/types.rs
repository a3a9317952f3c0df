//! Shared types used across Forseti modules

use serde::{Deserialize, Serialize};

/// Untrusted translator output, straight from `serde_json`.
///
/// Only the validator looks inside it.
pub type RawCandidate = serde_json::Value;

/// A message in a chat request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}
