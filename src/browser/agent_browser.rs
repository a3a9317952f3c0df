//! agent-browser runtime
//!
//! Each call is one `agent-browser` subprocess: arguments go in on the command
//! line and a single JSON envelope comes back on stdout. A failed spawn,
//! non-zero exit or `{"success": false}` envelope is reported as an error.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::process::Stdio;
use tokio::process::Command;

use crate::browser::page_op::PageOp;
use crate::browser::{PageRuntime, TabHandle, TabProvider};
use crate::core::config::BrowserConfig;
use crate::core::{ForsetiError, Result};

/// Envelope printed by `--json` commands
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TabEntry {
    #[serde(default)]
    index: Option<usize>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    active: bool,
}

/// Browser runtime driving the agent-browser CLI
pub struct AgentBrowser {
    binary: String,
    /// Session name for isolation
    session_name: String,
    /// Whether to run in headed mode
    headed: bool,
}

impl AgentBrowser {
    /// Create a runtime for a named session
    pub fn new(session_name: impl Into<String>) -> Self {
        Self {
            binary: "agent-browser".to_string(),
            session_name: session_name.into(),
            headed: false,
        }
    }

    pub fn from_config(config: &BrowserConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            session_name: config.session_name.clone(),
            headed: config.headed,
        }
    }

    /// Check if agent-browser is installed
    pub async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["--session", self.session_name.as_str()]);

        if self.headed {
            cmd.arg("--headed");
        }

        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    /// Run an agent-browser command
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(session = %self.session_name, ?args, "agent-browser");

        let output = self.command(args).output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ForsetiError::AgentBrowserNotFound
            } else {
                ForsetiError::browser(format!("Failed to run agent-browser: {}", e))
            }
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ForsetiError::browser(format!(
                "agent-browser command failed: {}",
                stderr.trim()
            )))
        }
    }

    /// Run a command with `--json` and unwrap its envelope
    async fn run_json_command(&self, args: &[&str]) -> Result<Value> {
        let mut full_args: Vec<&str> = args.to_vec();
        full_args.push("--json");
        let stdout = self.run_command(&full_args).await?;
        parse_envelope(&stdout)
    }
}

fn parse_envelope(stdout: &str) -> Result<Value> {
    let envelope: Envelope = serde_json::from_str(stdout.trim())?;
    if envelope.success {
        Ok(envelope.data)
    } else {
        Err(ForsetiError::browser(
            envelope
                .error
                .unwrap_or_else(|| "agent-browser reported failure".to_string()),
        ))
    }
}

/// The tab agent-browser flags as active. An unflagged list only counts when
/// it holds a single tab; with several there is no telling which is current.
fn pick_active_tab(data: Value) -> Result<Option<TabHandle>> {
    let list = match data {
        Value::Object(mut map) => map.remove("tabs").unwrap_or(Value::Array(Vec::new())),
        other => other,
    };
    let entries: Vec<TabEntry> = serde_json::from_value(list)?;
    let only_one = entries.len() == 1;

    Ok(entries
        .into_iter()
        .enumerate()
        .find(|(_, entry)| entry.active || only_one)
        .map(|(position, entry)| TabHandle {
            index: entry.index.unwrap_or(position),
            url: entry.url,
            title: entry.title,
        }))
}

/// `eval` wraps its value in `{"result": ...}`; accept a bare value too.
fn eval_result(data: Value) -> Value {
    match data {
        Value::Object(mut map) if map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[async_trait]
impl TabProvider for AgentBrowser {
    async fn active_tab(&self) -> Result<Option<TabHandle>> {
        let data = self.run_json_command(&["tab"]).await?;
        pick_active_tab(data)
    }
}

#[async_trait]
impl PageRuntime for AgentBrowser {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.run_command(&["open", url]).await?;
        Ok(())
    }

    /// `eval` runs on the session's current page, so the resolved tab is
    /// selected first.
    async fn run_isolated(&self, tab: &TabHandle, op: &PageOp) -> Result<Value> {
        tracing::debug!(tab = tab.index, url = %tab.url, op = op.name(), "running page operation");
        let index = tab.index.to_string();
        self.run_command(&["tab", index.as_str()]).await?;

        let script = op.script();
        let data = self.run_json_command(&["eval", script.as_str()]).await?;
        Ok(eval_result(data))
    }
}

impl Default for AgentBrowser {
    fn default() -> Self {
        Self::new("forseti")
    }
}
