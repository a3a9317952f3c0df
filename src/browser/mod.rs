//! Browser module - the boundary between the dispatcher and live pages
//!
//! `TabProvider` answers "which tab is focused right now". `PageRuntime`
//! navigates and runs `PageOp`s inside a page, handing back one JSON value.
//! Nothing crosses the boundary except serialized arguments and results.

mod agent_browser;
mod page_op;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::Result;

pub use agent_browser::AgentBrowser;
pub use page_op::{decode, ElementResult, PageOp, PageSummary};

/// A tab as seen at the moment it was resolved. Never cached across commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabHandle {
    pub index: usize,
    pub url: String,
    pub title: String,
}

/// Resolves the currently focused tab
#[async_trait]
pub trait TabProvider: Send + Sync {
    /// `None` when there is no tab to act on
    async fn active_tab(&self) -> Result<Option<TabHandle>>;
}

/// Executes operations against pages
#[async_trait]
pub trait PageRuntime: Send + Sync {
    /// Point the active tab at `url`
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Run `op` inside `tab`'s page and return its serialized result
    async fn run_isolated(&self, tab: &TabHandle, op: &PageOp) -> Result<serde_json::Value>;
}
