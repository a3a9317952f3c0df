//! Action module - schema and validation
//!
//! Everything the translator produces passes through `validate` before any
//! other component sees it.

pub mod schema;
pub mod validator;

pub use schema::{expected_shape, Action, ActionKind, ValueShape};
pub use validator::validate;
