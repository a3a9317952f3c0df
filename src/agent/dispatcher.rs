//! Dispatch coordinator
//!
//! Translate, validate, execute, reply. One attempt per command, no retries,
//! and every failure becomes a reply string.

use std::sync::Arc;

use crate::action::validate;
use crate::agent::executor::OperationExecutor;
use crate::core::{Config, CredentialSource, DispatchError, Result};
use crate::translator::{create_translator, parse_candidate, Translator};

/// Where the dispatcher currently is in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    Idle,
    Translating,
    Validating,
    Executing,
}

/// Reply to a blank command.
pub const EMPTY_COMMAND_REPLY: &str = "Please type a command.";

/// Entry point for callers: one command in, one reply out
pub struct Dispatcher {
    translator: Arc<dyn Translator>,
    credentials: Arc<dyn CredentialSource>,
    executor: OperationExecutor,
    stage: DispatchStage,
}

impl Dispatcher {
    pub fn new(
        translator: Arc<dyn Translator>,
        credentials: Arc<dyn CredentialSource>,
        executor: OperationExecutor,
    ) -> Self {
        Self {
            translator,
            credentials,
            executor,
            stage: DispatchStage::Idle,
        }
    }

    /// Build the translator named in `config`
    pub fn from_config(
        config: &Config,
        credentials: Arc<dyn CredentialSource>,
        executor: OperationExecutor,
    ) -> Result<Self> {
        Ok(Self::new(create_translator(config)?, credentials, executor))
    }

    pub fn stage(&self) -> DispatchStage {
        self.stage
    }

    pub fn translator_name(&self) -> &str {
        self.translator.name()
    }

    /// Whether a key is currently available, for status displays
    pub fn has_credential(&self) -> bool {
        self.credentials.api_key().is_some()
    }

    /// Process one command to completion. `&mut self` keeps it to one in flight.
    pub async fn dispatch(&mut self, command: &str) -> String {
        let command = command.trim();
        if command.is_empty() {
            return EMPTY_COMMAND_REPLY.to_string();
        }

        let mut stage = StageGuard(&mut self.stage);
        let result = Self::run(
            self.translator.as_ref(),
            self.credentials.as_ref(),
            &self.executor,
            &mut stage,
            command,
        )
        .await;

        match result {
            Ok(reply) => reply,
            Err(e) => {
                tracing::info!(stage = ?*stage.0, error = %e, "command failed");
                e.reply()
            }
        }
    }

    async fn run(
        translator: &dyn Translator,
        credentials: &dyn CredentialSource,
        executor: &OperationExecutor,
        stage: &mut StageGuard<'_>,
        command: &str,
    ) -> std::result::Result<String, DispatchError> {
        let api_key = credentials.api_key();
        if api_key.is_none() && translator.requires_credential() {
            return Err(DispatchError::MissingCredential);
        }

        stage.set(DispatchStage::Translating);
        let text = translator.translate(command, api_key.as_deref()).await?;
        let candidate = parse_candidate(&text)?;

        stage.set(DispatchStage::Validating);
        let action = validate(&candidate)?;
        tracing::debug!(kind = %action.kind(), "action validated");

        stage.set(DispatchStage::Executing);
        let payload = executor.execute(&action).await?;
        Ok(payload.to_string())
    }
}

/// Puts the stage back to `Idle` when a dispatch ends, including when its
/// future is dropped part way through.
struct StageGuard<'a>(&'a mut DispatchStage);

impl StageGuard<'_> {
    fn set(&mut self, stage: DispatchStage) {
        *self.0 = stage;
    }
}

impl Drop for StageGuard<'_> {
    fn drop(&mut self) {
        *self.0 = DispatchStage::Idle;
    }
}
