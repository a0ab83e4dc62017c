//! # acam-core
//!
//! Core library for the ALPHACAM SDK providing:
//! - Configuration file parsing (sdk_config.json)
//! - JSON Schema validation of the configuration document
//! - Shared error types
//! - Retry execution engine with policy-based configuration

pub mod config;
pub mod error;
pub mod retry;
pub mod schema;
pub mod types;

pub use config::{SdkConfig, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use schema::SchemaValidator;
