//! Operation executor
//!
//! Runs a validated `Action` against the browser. All kind-specific behaviour
//! lives here; the dispatcher only formats what comes back.

use futures::FutureExt;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::action::Action;
use crate::browser::{decode, AgentBrowser, ElementResult, PageOp, PageRuntime, PageSummary, TabProvider};
use crate::core::{DispatchError, Result};

/// What an executed action produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Navigated { url: String },
    Clicked { selector: String },
    Filled { selector: String, text: String },
    /// The operation ran but nothing matched the selector
    NotFound { selector: String },
    Summary(PageSummary),
    Said(String),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Navigated { url } => write!(f, "Navigation started to {}.", url),
            Payload::Clicked { selector } => {
                write!(f, "Element with selector '{}' clicked successfully.", selector)
            }
            Payload::Filled { selector, text } => {
                write!(f, "Field {} filled with value: {}.", selector, text)
            }
            Payload::NotFound { selector } => {
                write!(f, "No element found with selector '{}'.", selector)
            }
            Payload::Summary(summary) => write!(
                f,
                "Page analysis: Title: \"{}\". The page has {} paragraphs and {} links.",
                summary.title, summary.paragraphs, summary.links
            ),
            Payload::Said(text) => f.write_str(text),
        }
    }
}

/// Success payload or the reason the operation could not run
pub type ExecutionOutcome = std::result::Result<Payload, DispatchError>;

/// Executes actions through a tab provider and page runtime
#[derive(Clone)]
pub struct OperationExecutor {
    tabs: Arc<dyn TabProvider>,
    runtime: Arc<dyn PageRuntime>,
}

impl OperationExecutor {
    pub fn new(tabs: Arc<dyn TabProvider>, runtime: Arc<dyn PageRuntime>) -> Self {
        Self { tabs, runtime }
    }

    /// One agent-browser session serves as both tab provider and runtime
    pub fn with_agent_browser(browser: AgentBrowser) -> Self {
        let browser = Arc::new(browser);
        Self::new(browser.clone(), browser)
    }

    pub async fn execute(&self, action: &Action) -> ExecutionOutcome {
        match action {
            Action::Navigate { url } => match guarded(self.runtime.navigate(url)).await? {
                Ok(()) => Ok(Payload::Navigated { url: url.clone() }),
                Err(e) => {
                    tracing::warn!(%url, error = %e, "navigation failed");
                    Err(DispatchError::NavigationFailed(e.to_string()))
                }
            },
            Action::Click { selector } => {
                let op = PageOp::Click {
                    selector: selector.clone(),
                };
                let result: ElementResult = self.run_page(op).await?;
                Ok(if result.found {
                    Payload::Clicked {
                        selector: selector.clone(),
                    }
                } else {
                    Payload::NotFound {
                        selector: selector.clone(),
                    }
                })
            }
            Action::FillForm { selector, text } => {
                let op = PageOp::Fill {
                    selector: selector.clone(),
                    text: text.clone(),
                };
                let result: ElementResult = self.run_page(op).await?;
                Ok(if result.found {
                    Payload::Filled {
                        selector: selector.clone(),
                        text: text.clone(),
                    }
                } else {
                    Payload::NotFound {
                        selector: selector.clone(),
                    }
                })
            }
            Action::GetContent => Ok(Payload::Summary(self.run_page(PageOp::Summarize).await?)),
            Action::Say { text } => Ok(Payload::Said(text.clone())),
        }
    }

    /// Resolve the tab afresh, run `op` in it, decode the single result.
    async fn run_page<T: DeserializeOwned>(&self, op: PageOp) -> std::result::Result<T, DispatchError> {
        let tab = match guarded(self.tabs.active_tab()).await? {
            Ok(Some(tab)) => tab,
            Ok(None) => return Err(DispatchError::NoActiveTab),
            Err(e) => {
                tracing::warn!(error = %e, "could not resolve active tab");
                return Err(DispatchError::fault(e.to_string()));
            }
        };

        match guarded(self.runtime.run_isolated(&tab, &op)).await? {
            Ok(value) => decode(&op, value),
            Err(e) => {
                tracing::warn!(op = op.name(), tab = tab.index, error = %e, "page operation faulted");
                Err(DispatchError::fault(e.to_string()))
            }
        }
    }
}

/// Await `fut`, turning a panic inside it into `ExecutionFault`.
async fn guarded<T>(fut: impl Future<Output = Result<T>>) -> std::result::Result<Result<T>, DispatchError> {
    AssertUnwindSafe(fut).catch_unwind().await.map_err(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::error!(%message, "browser boundary panicked");
        DispatchError::fault(message)
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::TabHandle;
    use async_trait::async_trait;
    use serde_json::Value;

    struct PanickingRuntime;

    #[async_trait]
    impl TabProvider for PanickingRuntime {
        async fn active_tab(&self) -> Result<Option<TabHandle>> {
            Ok(Some(TabHandle {
                index: 0,
                url: "https://example.com/".into(),
                title: "Example".into(),
            }))
        }
    }

    #[async_trait]
    impl PageRuntime for PanickingRuntime {
        async fn navigate(&self, _url: &str) -> Result<()> {
            panic!("renderer crashed")
        }

        async fn run_isolated(&self, _tab: &TabHandle, _op: &PageOp) -> Result<Value> {
            panic!("{}", String::from("renderer crashed"))
        }
    }

    fn executor() -> OperationExecutor {
        let runtime = Arc::new(PanickingRuntime);
        OperationExecutor::new(runtime.clone(), runtime)
    }

    #[tokio::test]
    async fn test_panic_becomes_fault() {
        let outcome = executor()
            .execute(&Action::Click {
                selector: "button".into(),
            })
            .await;
        assert_eq!(outcome, Err(DispatchError::fault("renderer crashed")));

        let outcome = executor()
            .execute(&Action::Navigate {
                url: "https://example.com".into(),
            })
            .await;
        assert!(matches!(outcome, Err(DispatchError::ExecutionFault(_))));
    }

    #[tokio::test]
    async fn test_say_never_touches_browser() {
        let outcome = executor()
            .execute(&Action::Say {
                text: "Olá, como posso ajudar?".into(),
            })
            .await
            .unwrap();
        assert_eq!(outcome.to_string(), "Olá, como posso ajudar?");
    }

    #[test]
    fn test_payload_replies() {
        assert_eq!(
            Payload::Navigated {
                url: "https://example.com".into()
            }
            .to_string(),
            "Navigation started to https://example.com."
        );
        assert_eq!(
            Payload::NotFound {
                selector: "#missing".into()
            }
            .to_string(),
            "No element found with selector '#missing'."
        );
        assert_eq!(
            Payload::Summary(PageSummary {
                title: "Docs".into(),
                paragraphs: 4,
                links: 9
            })
            .to_string(),
            "Page analysis: Title: \"Docs\". The page has 4 paragraphs and 9 links."
        );
    }
}
