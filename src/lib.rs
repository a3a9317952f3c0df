//! Forseti - natural-language browser control
//!
//! A command such as "go to https://example.com" is translated into one of
//! five browser actions, validated against a fixed schema, executed against
//! the active tab, and answered with a single reply string.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, credentials and error handling
//! - **Action**: The action schema and the validator guarding it
//! - **LLM**: OpenAI-compatible chat client
//! - **Translator**: Command text to raw action text
//! - **Browser**: Tab resolution and isolated page operations
//! - **Agent**: Operation executor and dispatch coordinator
//! - **CLI**: REPL and meta-commands
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use forseti::agent::{Dispatcher, OperationExecutor};
//! use forseti::browser::AgentBrowser;
//! use forseti::core::EnvCredentials;
//! use forseti::translator::create_translator;
//! use forseti::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load();
//!     let executor = OperationExecutor::with_agent_browser(AgentBrowser::from_config(&config.browser));
//!     let mut dispatcher = Dispatcher::new(
//!         create_translator(&config).unwrap(),
//!         Arc::new(EnvCredentials),
//!         executor,
//!     );
//!
//!     let reply = dispatcher.dispatch("go to https://example.com").await;
//!     println!("{}", reply);
//! }
//! ```

pub mod action;
pub mod agent;
pub mod browser;
pub mod cli;
pub mod core;
pub mod llm;
pub mod translator;

// Re-export commonly used items
pub use action::{Action, ActionKind};
pub use agent::Dispatcher;
pub use cli::Repl;
pub use core::{Config, DispatchError, ForsetiError, Result};
