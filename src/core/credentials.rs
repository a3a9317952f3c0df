//! Credential sources for the translation service
//!
//! The dispatcher never reads ambient state for its key; it is handed a
//! `CredentialSource` and asks it once per command.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::Config;
use crate::core::error::{ForsetiError, Result};

/// Anything that can produce an API key, or say there is none
pub trait CredentialSource: Send + Sync {
    /// The key, or `None` when absent. Blank keys count as absent.
    fn api_key(&self) -> Option<String>;
}

fn non_blank(key: String) -> Option<String> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A fixed key (or none), handy for `--api-key` style overrides and tests
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Option<String>);

impl StaticCredentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        self.0.clone().and_then(non_blank)
    }
}

/// Reads `FORSETI_API_KEY`, then `OPENAI_API_KEY`
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        ["FORSETI_API_KEY", "OPENAI_API_KEY"]
            .iter()
            .find_map(|name| env::var(name).ok().and_then(non_blank))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct KeyFileContents {
    #[serde(default)]
    api_key: Option<String>,
}

/// Key persisted in `credentials.toml` next to the config file.
///
/// Re-read on every lookup so a key saved mid-session applies to the next command.
#[derive(Debug, Clone)]
pub struct KeyFile {
    path: PathBuf,
}

impl KeyFile {
    /// The default location, `~/.config/forseti/credentials.toml`
    pub fn default_location() -> Self {
        Self::at(Config::config_dir().join("credentials.toml"))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store a key, replacing any previous one
    pub fn save(&self, key: &str) -> Result<()> {
        let key = non_blank(key.to_string())
            .ok_or_else(|| ForsetiError::config("Please enter a valid API key"))?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(&KeyFileContents { api_key: Some(key) })
            .map_err(|e| ForsetiError::config(format!("Failed to serialize key: {}", e)))?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn read(&self) -> Option<String> {
        let content = fs::read_to_string(&self.path).ok()?;
        match toml::from_str::<KeyFileContents>(&content) {
            Ok(contents) => contents.api_key.and_then(non_blank),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable key file");
                None
            }
        }
    }
}

impl CredentialSource for KeyFile {
    fn api_key(&self) -> Option<String> {
        self.read()
    }
}

/// Tries each source in order; the first key found wins
pub struct ChainedCredentials {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl ChainedCredentials {
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }
}

impl CredentialSource for ChainedCredentials {
    fn api_key(&self) -> Option<String> {
        self.sources.iter().find_map(|s| s.api_key())
    }
}
