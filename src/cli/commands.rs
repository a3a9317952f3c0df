//! CLI commands
//!
//! Special commands that can be executed in the REPL.

use crate::agent::Dispatcher;
use crate::core::{Config, KeyFile};

/// Result of parsing a command
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Not a meta-command; dispatch it
    Continue(String),
    /// Command was handled, show output
    Handled(String),
    /// Exit the REPL
    Exit,
}

/// What the meta-commands need to see
pub struct CommandContext<'a> {
    pub config: &'a Config,
    pub dispatcher: &'a Dispatcher,
    pub key_file: &'a KeyFile,
    pub browser_available: bool,
}

/// Parse and handle special commands.
///
/// A bare word is a meta-command only when it is the whole input, so
/// "help me find the login button" is still dispatched. Commands taking an
/// argument need the `/` prefix (`/key <api-key>`).
pub fn handle_command(input: &str, ctx: &CommandContext<'_>) -> CommandResult {
    let input = input.trim();
    let (cmd, args) = match input.strip_prefix('/') {
        Some(rest) => match rest.split_once(char::is_whitespace) {
            Some((cmd, args)) => (cmd.to_lowercase(), args.trim()),
            None => (rest.to_lowercase(), ""),
        },
        None if !input.contains(char::is_whitespace) && input != "key" => {
            (input.to_lowercase(), "")
        }
        None => return CommandResult::Continue(input.to_string()),
    };

    match cmd.as_str() {
        "exit" | "quit" | "q" => CommandResult::Exit,

        "help" | "?" => CommandResult::Handled(help_text()),

        "status" => CommandResult::Handled(format!(
            "Forseti Status:\n\
             ─────────────────────────────\n\
             Translator:   {}\n\
             Model:        {}\n\
             API key:      {}\n\
             Browser:      {} (session '{}')\n\
             Debug:        {}",
            ctx.dispatcher.translator_name(),
            ctx.config.translator.model,
            if ctx.dispatcher.has_credential() {
                "configured"
            } else {
                "missing"
            },
            if ctx.browser_available {
                "agent-browser found"
            } else {
                "agent-browser not found"
            },
            ctx.config.browser.session_name,
            if ctx.config.agent.debug { "on" } else { "off" }
        )),

        "key" => {
            if args.is_empty() {
                return CommandResult::Handled("Usage: /key <api-key>".to_string());
            }
            match ctx.key_file.save(args) {
                Ok(()) => CommandResult::Handled(format!(
                    "API key saved to {}",
                    ctx.key_file.path().display()
                )),
                Err(e) => CommandResult::Handled(format!("Could not save API key: {}", e)),
            }
        }

        "config" => CommandResult::Handled(format!(
            "# {}\n{}",
            Config::config_file().display(),
            Config::default_config_toml()
        )),

        _ => CommandResult::Continue(input.to_string()),
    }
}

/// Generate help text
fn help_text() -> String {
    r#"Forseti Commands:
─────────────────────────────────────────────
  help, ?          Show this help message
  exit, quit, q    Exit Forseti
  status           Show translator, key and browser status
  /key <api-key>   Save the translation service API key
  config           Show the default configuration file

Commands are recognised only on their own (or with a leading '/').

Anything else is sent as a browser command, e.g.:
  go to https://example.com
  click the sign-in button
  fill the search box with rust
  summarize this page
─────────────────────────────────────────────"#
        .to_string()
}
