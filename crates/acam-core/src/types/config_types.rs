//! Configuration types for sdk_config.json
//!
//! ```json
//! {
//!   "sdkVersion": "1.0.0",
//!   "alphacamVersion": "2023.1",
//!   "paths": {
//!     "installation": "C:/Program Files/Hexagon/ALPHACAM 2023.1",
//!     "sdk": { "root": "D:/ALPHACAM API" }
//!   }
//! }
//! ```

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::RetryPolicy;

/// Top-level configuration document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkConfigFile {
    /// SDK version the configuration was written for
    pub sdk_version: String,

    /// Version of the hosting ALPHACAM installation
    pub alphacam_version: String,

    /// Filesystem locations
    pub paths: PathConfig,

    /// Staging behaviour
    #[serde(default)]
    pub sync: SyncSettings,
}

/// Installation and workspace locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathConfig {
    /// ALPHACAM installation directory (artifact source root)
    pub installation: Utf8PathBuf,

    /// ALPHACAM per-user data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<Utf8PathBuf>,

    /// SDK workspace layout
    pub sdk: SdkPathConfig,
}

/// SDK workspace layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkPathConfig {
    /// Workspace root that artifacts are staged into
    pub root: Utf8PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lib: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Utf8PathBuf>,
}

/// Tuning for artifact staging and component loading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    /// Upper bound on concurrent artifact copies
    #[serde(default = "default_max_concurrent_copies")]
    pub max_concurrent_copies: usize,

    /// Per-attempt timeout for a single copy, in seconds
    #[serde(default = "default_copy_timeout_secs")]
    pub copy_timeout_secs: u64,

    /// Timeout for loading a single component, in seconds
    #[serde(default = "default_load_timeout_secs")]
    pub load_timeout_secs: u64,

    /// Retry policy applied to artifact copies
    #[serde(default = "default_copy_retry")]
    pub retry: RetryPolicy,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            max_concurrent_copies: default_max_concurrent_copies(),
            copy_timeout_secs: default_copy_timeout_secs(),
            load_timeout_secs: default_load_timeout_secs(),
            retry: default_copy_retry(),
        }
    }
}

fn default_max_concurrent_copies() -> usize {
    4
}
fn default_copy_timeout_secs() -> u64 {
    30
}
fn default_load_timeout_secs() -> u64 {
    10
}

fn default_copy_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_delay_ms: 200,
        max_delay_ms: 5000,
        ..RetryPolicy::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RetryStrategy;

    #[test]
    fn test_minimal_document_uses_sync_defaults() {
        let json = r#"{
            "sdkVersion": "1.0.0",
            "alphacamVersion": "2023.1",
            "paths": { "installation": "/opt/acam", "sdk": { "root": "/srv/sdk" } }
        }"#;

        let config: SdkConfigFile = serde_json::from_str(json).unwrap();
        assert_eq!(config.paths.installation, "/opt/acam");
        assert_eq!(config.paths.sdk.root, "/srv/sdk");
        assert!(config.paths.sdk.lib.is_none());
        assert_eq!(config.sync.max_concurrent_copies, 4);
        assert_eq!(config.sync.retry.max_attempts, 3);
    }

    #[test]
    fn test_sync_section_overrides() {
        let json = r#"{
            "sdkVersion": "1.0.0",
            "alphacamVersion": "2023.1",
            "paths": {
                "installation": "/opt/acam",
                "userData": "/home/acam",
                "sdk": { "root": "/srv/sdk", "docs": "/srv/sdk/docs" }
            },
            "sync": { "maxConcurrentCopies": 1, "retry": { "strategy": "none" } }
        }"#;

        let config: SdkConfigFile = serde_json::from_str(json).unwrap();
        assert_eq!(config.sync.max_concurrent_copies, 1);
        assert_eq!(config.sync.copy_timeout_secs, 30);
        assert_eq!(config.paths.user_data.as_deref().map(|p| p.as_str()), Some("/home/acam"));
        assert_eq!(config.sync.retry.strategy, RetryStrategy::None);
    }
}
