//! Configuration loading

mod loader;

pub use loader::{SdkConfig, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
