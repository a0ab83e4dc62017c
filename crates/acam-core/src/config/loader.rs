//! Configuration file loading and parsing

use crate::error::{Error, Result};
use crate::schema::{SchemaValidator, SDK_CONFIG_SCHEMA};
use crate::types::{SdkConfigFile, SyncSettings};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tracing::debug;

/// Configuration file name searched for during discovery
pub const CONFIG_FILE_NAME: &str = "sdk_config.json";

/// Environment variable that points at an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "ACAM_SDK_CONFIG";

/// Loaded and validated SDK configuration
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// The parsed configuration
    pub config: SdkConfigFile,

    /// Path to the configuration file
    pub config_path: Utf8PathBuf,
}

impl SdkConfig {
    /// Load configuration from the specified path or search for it.
    ///
    /// A missing file is reported as [`Error::ConfigNotFound`]; there is no
    /// built-in fallback configuration.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let (config_path, content) = match path {
            Some(p) => (p.to_owned(), read_config(p)?),
            None => Self::find_config()?,
        };

        Self::from_json(&content, config_path)
    }

    /// Validate and parse a configuration document.
    ///
    /// Relative `paths.installation` and `paths.sdk.root` values are resolved
    /// against the directory containing `config_path`.
    pub fn from_json(content: &str, config_path: Utf8PathBuf) -> Result<Self> {
        let validator = SchemaValidator::new()?;
        let value = validator.validate_json(content, SDK_CONFIG_SCHEMA)?;

        let mut config: SdkConfigFile = serde_json::from_value(value)?;

        if config.paths.installation.as_str().trim().is_empty() {
            return Err(Error::missing_field("paths.installation"));
        }
        if config.paths.sdk.root.as_str().trim().is_empty() {
            return Err(Error::missing_field("paths.sdk.root"));
        }

        let base_dir = config_path
            .parent()
            .map(|p| p.to_owned())
            .unwrap_or_else(|| Utf8PathBuf::from("."));
        config.paths.installation = resolve(&base_dir, &config.paths.installation);
        config.paths.sdk.root = resolve(&base_dir, &config.paths.sdk.root);

        debug!(
            "Loaded SDK configuration from {} (installation: {}, workspace: {})",
            config_path, config.paths.installation, config.paths.sdk.root
        );

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Find the configuration file.
    ///
    /// Search order: `ACAM_SDK_CONFIG`, the executable's directory, then the
    /// current directory and its parents.
    fn find_config() -> Result<(Utf8PathBuf, String)> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
            let path = Utf8PathBuf::from(explicit);
            let content = read_config(&path)?;
            return Ok((path, content));
        }

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
            .and_then(|dir| Utf8PathBuf::try_from(dir).ok())
        {
            let path = exe_dir.join(CONFIG_FILE_NAME);
            if path.is_file() {
                let content = fs::read_to_string(&path)?;
                return Ok((path, content));
            }
        }

        let cwd = std::env::current_dir().map_err(Error::Io)?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|_| Error::invalid_config("Current directory path is not valid UTF-8"))?;

        let mut current = cwd.as_path();
        loop {
            let path = current.join(CONFIG_FILE_NAME);
            if path.is_file() {
                let content = fs::read_to_string(&path)?;
                return Ok((path, content));
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Err(Error::config_not_found(format!(
            "{} (searched executable directory, current and parent directories)",
            CONFIG_FILE_NAME
        )))
    }

    /// Get the inner configuration file
    pub fn inner(&self) -> &SdkConfigFile {
        &self.config
    }

    /// ALPHACAM installation directory artifacts are read from
    pub fn installation_root(&self) -> &Utf8Path {
        &self.config.paths.installation
    }

    /// Workspace root artifacts are staged into
    pub fn workspace_root(&self) -> &Utf8Path {
        &self.config.paths.sdk.root
    }

    /// Configured SDK version string
    pub fn sdk_version(&self) -> &str {
        &self.config.sdk_version
    }

    /// Configured ALPHACAM version string
    pub fn alphacam_version(&self) -> &str {
        &self.config.alphacam_version
    }

    /// Staging settings
    pub fn sync(&self) -> &SyncSettings {
        &self.config.sync
    }
}

fn read_config(path: &Utf8Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config_not_found(path.as_str())
        } else {
            Error::Io(e)
        }
    })
}

fn resolve(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_owned()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const VALID: &str = r#"{
        "sdkVersion": "1.0.0",
        "alphacamVersion": "2023.1",
        "paths": { "installation": "install", "sdk": { "root": "/srv/acam-sdk" } }
    }"#;

    fn write_config(dir: &TempDir, content: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::try_from(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, VALID);

        let config = SdkConfig::load(Some(&path)).unwrap();
        assert_eq!(config.sdk_version(), "1.0.0");
        assert_eq!(config.alphacam_version(), "2023.1");
        assert_eq!(config.workspace_root(), "/srv/acam-sdk");
        assert_eq!(config.config_path, path);
    }

    #[test]
    fn test_relative_installation_resolves_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, VALID);

        let config = SdkConfig::load(Some(&path)).unwrap();
        let expected = path.parent().unwrap().join("install");
        assert_eq!(config.installation_root(), expected);
    }

    #[test]
    fn test_missing_file_is_config_not_found() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(dir.path().join("absent.json")).unwrap();

        let err = SdkConfig::load(Some(&path)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_malformed_json_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "{ not json");

        let err = SdkConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::JsonParse(_)));
    }

    #[test]
    fn test_schema_violation_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{ "sdkVersion": "1.0.0" }"#);

        let err = SdkConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::SchemaValidation { .. }));
    }

    #[test]
    fn test_blank_installation_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{
                "sdkVersion": "1.0.0",
                "alphacamVersion": "2023.1",
                "paths": { "installation": "   ", "sdk": { "root": "/srv/acam-sdk" } }
            }"#,
        );

        let err = SdkConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::MissingField { .. }));
    }

    #[test]
    #[serial]
    fn test_discovery_via_env_var() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, VALID);

        std::env::set_var(CONFIG_ENV_VAR, path.as_str());
        let result = SdkConfig::load(None);
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(result.unwrap().config_path, path);
    }

    #[test]
    #[serial]
    fn test_discovery_env_var_pointing_nowhere() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");

        std::env::set_var(CONFIG_ENV_VAR, &missing);
        let result = SdkConfig::load(None);
        std::env::remove_var(CONFIG_ENV_VAR);

        assert!(result.unwrap_err().is_not_found());
    }
}
