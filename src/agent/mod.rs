//! Agent module - execution and dispatch
//!
//! The dispatcher drives a command through translation and validation, then
//! hands the action to the executor.

pub mod dispatcher;
pub mod executor;

pub use dispatcher::{DispatchStage, Dispatcher, EMPTY_COMMAND_REPLY};
pub use executor::{ExecutionOutcome, OperationExecutor, Payload};
