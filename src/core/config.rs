//! Configuration management for Forseti
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/forseti/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{ForsetiError, Result};

/// Main configuration for Forseti
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Translation service configuration
    #[serde(default)]
    pub translator: TranslatorConfig,
    /// Browser configuration
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Agent configuration
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Which translator turns commands into actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// OpenAI-compatible chat completions endpoint
    OpenAi,
    /// Offline keyword matcher
    Keyword,
}

impl ProviderType {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "keyword" | "offline" => Some(Self::Keyword),
            _ => None,
        }
    }
}

/// Translation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    /// Provider used for translation
    pub provider: ProviderType,
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Model name sent with every request
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Browser automation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// agent-browser executable
    pub binary: String,
    /// Session name for agent-browser
    pub session_name: String,
    /// Whether to run in headed mode (visible browser)
    pub headed: bool,
}

/// Agent behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Whether to show debug output
    pub debug: bool,
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: env::var("FORSETI_PROVIDER")
                .ok()
                .and_then(|p| ProviderType::from_env_value(&p))
                .unwrap_or(ProviderType::OpenAi),
            base_url: env::var("FORSETI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            model: env::var("FORSETI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            timeout_secs: 120,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            binary: env::var("FORSETI_BROWSER_BIN")
                .unwrap_or_else(|_| "agent-browser".to_string()),
            session_name: env::var("FORSETI_BROWSER_SESSION")
                .unwrap_or_else(|_| "forseti".to_string()),
            headed: env_flag("FORSETI_BROWSER_HEADED", false),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            debug: env_flag("FORSETI_DEBUG", false),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("forseti")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();

        let mut config = Self::load_from_file().unwrap_or_default();
        config.apply_env();
        config
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(ForsetiError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| ForsetiError::config(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ForsetiError::config(format!("Failed to parse config: {}", e)))
    }

    /// Env vars win over whatever the file said.
    fn apply_env(&mut self) {
        if let Some(provider) = env::var("FORSETI_PROVIDER")
            .ok()
            .and_then(|p| ProviderType::from_env_value(&p))
        {
            self.translator.provider = provider;
        }
        if let Ok(url) = env::var("FORSETI_BASE_URL") {
            self.translator.base_url = url;
        }
        if let Ok(model) = env::var("FORSETI_MODEL") {
            self.translator.model = model;
        }
        if let Ok(bin) = env::var("FORSETI_BROWSER_BIN") {
            self.browser.binary = bin;
        }
        if let Ok(session) = env::var("FORSETI_BROWSER_SESSION") {
            self.browser.session_name = session;
        }
        if env::var("FORSETI_BROWSER_HEADED").is_ok() {
            self.browser.headed = env_flag("FORSETI_BROWSER_HEADED", self.browser.headed);
        }
        if env::var("FORSETI_DEBUG").is_ok() {
            self.agent.debug = env_flag("FORSETI_DEBUG", self.agent.debug);
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| ForsetiError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ForsetiError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| ForsetiError::config(format!("Failed to write config: {}", e)))?;

        Ok(config_path)
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        toml::to_string_pretty(&Config::default())
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }

    /// Whether the configured translator talks to the network
    pub fn is_offline(&self) -> bool {
        self.translator.provider == ProviderType::Keyword
    }
}
