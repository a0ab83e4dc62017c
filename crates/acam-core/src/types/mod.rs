//! Type definitions shared across the SDK crates

mod config_types;
mod retry_types;

pub use config_types::*;
pub use retry_types::*;
