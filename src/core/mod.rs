//! Core module - shared infrastructure for Forseti
//!
//! This module contains foundational types, configuration, credentials and
//! error handling used throughout the application.

pub mod config;
pub mod credentials;
pub mod error;
pub mod types;

pub use config::{Config, ProviderType};
pub use credentials::{
    ChainedCredentials, CredentialSource, EnvCredentials, KeyFile, StaticCredentials,
};
pub use error::{DispatchError, ForsetiError, Result};
pub use types::*;
