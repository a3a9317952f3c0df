//! In-memory stand-ins for the translator and the browser

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use forseti::agent::{Dispatcher, OperationExecutor};
use forseti::browser::{PageOp, PageRuntime, TabHandle, TabProvider};
use forseti::core::{DispatchError, ForsetiError, Result, StaticCredentials};
use forseti::translator::Translator;

/// Replies with a fixed result and counts calls
pub struct FakeTranslator {
    reply: std::result::Result<String, DispatchError>,
    pub calls: AtomicUsize,
}

impl FakeTranslator {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn wire(value: Value) -> Arc<Self> {
        Self::replying(&value.to_string())
    }

    pub fn failing(err: DispatchError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(
        &self,
        _command: &str,
        _api_key: Option<&str>,
    ) -> std::result::Result<String, DispatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Page state the fake runtime reads and mutates
#[derive(Debug, Default)]
pub struct PageState {
    pub title: String,
    pub paragraphs: usize,
    pub links: usize,
    /// selector -> current value
    pub fields: HashMap<String, String>,
    pub clicks: Vec<String>,
    pub events: Vec<(String, &'static str)>,
    pub location: Option<String>,
}

/// How the fake page answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    Normal,
    /// The script throws inside the page
    Throws,
    /// The script returns undefined
    ReturnsNothing,
}

/// A fake browser: one active tab that can be closed or switched
pub struct FakeBrowser {
    pub page: Mutex<PageState>,
    pub tab: Mutex<Option<TabHandle>>,
    pub mode: Mutex<PageMode>,
    pub navigation_error: Mutex<Option<String>>,
    pub tab_lookups: AtomicUsize,
    pub isolated_runs: AtomicUsize,
}

impl FakeBrowser {
    pub fn new() -> Arc<Self> {
        let mut fields = HashMap::new();
        fields.insert("input#username".to_string(), String::new());
        fields.insert("button".to_string(), String::new());

        Arc::new(Self {
            page: Mutex::new(PageState {
                title: "Example Domain".to_string(),
                paragraphs: 2,
                links: 1,
                fields,
                ..PageState::default()
            }),
            tab: Mutex::new(Some(tab(0, "https://example.com/"))),
            mode: Mutex::new(PageMode::Normal),
            navigation_error: Mutex::new(None),
            tab_lookups: AtomicUsize::new(0),
            isolated_runs: AtomicUsize::new(0),
        })
    }

    pub fn close_tab(&self) {
        *self.tab.lock().unwrap() = None;
    }

    pub fn switch_tab(&self, handle: TabHandle) {
        *self.tab.lock().unwrap() = Some(handle);
    }

    pub fn set_mode(&self, mode: PageMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn fail_navigation(&self, message: &str) {
        *self.navigation_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn lookups(&self) -> usize {
        self.tab_lookups.load(Ordering::SeqCst)
    }

    pub fn runs(&self) -> usize {
        self.isolated_runs.load(Ordering::SeqCst)
    }
}

pub fn tab(index: usize, url: &str) -> TabHandle {
    TabHandle {
        index,
        url: url.to_string(),
        title: String::new(),
    }
}

#[async_trait]
impl TabProvider for FakeBrowser {
    async fn active_tab(&self) -> Result<Option<TabHandle>> {
        self.tab_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.tab.lock().unwrap().clone())
    }
}

#[async_trait]
impl PageRuntime for FakeBrowser {
    async fn navigate(&self, url: &str) -> Result<()> {
        if let Some(message) = self.navigation_error.lock().unwrap().clone() {
            return Err(ForsetiError::browser(message));
        }
        self.page.lock().unwrap().location = Some(url.to_string());
        Ok(())
    }

    /// Mirrors the page scripts: results come back stringified.
    async fn run_isolated(&self, _tab: &TabHandle, op: &PageOp) -> Result<Value> {
        self.isolated_runs.fetch_add(1, Ordering::SeqCst);

        match *self.mode.lock().unwrap() {
            PageMode::Throws => {
                return Err(ForsetiError::browser(
                    "Uncaught SyntaxError: Failed to execute 'querySelector'",
                ))
            }
            PageMode::ReturnsNothing => return Ok(Value::Null),
            PageMode::Normal => {}
        }

        let mut page = self.page.lock().unwrap();
        let result = match op {
            PageOp::Click { selector } => {
                let found = page.fields.contains_key(selector);
                if found {
                    page.clicks.push(selector.clone());
                }
                json!({ "found": found })
            }
            PageOp::Fill { selector, text } => match page.fields.get_mut(selector) {
                Some(value) => {
                    *value = text.clone();
                    page.events.push((selector.clone(), "input"));
                    page.events.push((selector.clone(), "change"));
                    json!({ "found": true })
                }
                None => json!({ "found": false }),
            },
            PageOp::Summarize => json!({
                "title": page.title,
                "paragraphs": page.paragraphs,
                "links": page.links,
            }),
        };
        Ok(Value::String(result.to_string()))
    }
}

pub fn executor(browser: &Arc<FakeBrowser>) -> OperationExecutor {
    OperationExecutor::new(browser.clone(), browser.clone())
}

/// Dispatcher with a key configured
pub fn dispatcher(translator: Arc<FakeTranslator>, browser: &Arc<FakeBrowser>) -> Dispatcher {
    Dispatcher::new(
        translator,
        Arc::new(StaticCredentials::new("sk-test")),
        executor(browser),
    )
}
