//! Common test utilities for acam-sdk
//!
//! Builds a temporary ALPHACAM installation, SDK workspace and
//! configuration file, plus facades wired to them.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use acam_components::{
    ArtifactKind, ComponentHandle, ComponentLoader, FileComponentLoader, LoadError, Manifest,
};
use acam_sdk::{ComponentBackedFactory, SdkFacade, SdkFacadeBuilder};
use camino::Utf8PathBuf;
use tempfile::TempDir;

/// Minimal PE image carrying a `FileVersion` resource string
pub fn pe_image(version: &str) -> Vec<u8> {
    let mut bytes = vec![0u8; 0x40];
    bytes[0] = b'M';
    bytes[1] = b'Z';
    bytes[0x3c..0x40].copy_from_slice(&0x40u32.to_le_bytes());
    bytes.extend_from_slice(b"PE\0\0");
    bytes.extend_from_slice(&[0u8; 6]);
    bytes.extend(utf16z("FileVersion"));
    bytes.extend_from_slice(&[0, 0]);
    bytes.extend(utf16z(version));
    bytes
}

fn utf16z(s: &str) -> Vec<u8> {
    let mut out: Vec<u8> = s.encode_utf16().flat_map(u16::to_le_bytes).collect();
    out.extend_from_slice(&[0, 0]);
    out
}

/// Installation, workspace and config file under one temporary directory
pub struct SdkFixture {
    temp_dir: TempDir,
    config_path: Utf8PathBuf,
}

impl SdkFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        std::fs::create_dir_all(temp_dir.path().join("alphacam")).expect("create installation");

        let config_path = Utf8PathBuf::from_path_buf(temp_dir.path().join("sdk_config.json"))
            .expect("temp path is UTF-8");
        let config = serde_json::json!({
            "sdkVersion": "1.0.0",
            "alphacamVersion": "2023.1",
            "paths": {
                "installation": "alphacam",
                "sdk": { "root": "sdk" }
            },
            "sync": {
                "retry": { "maxAttempts": 1, "strategy": "none" }
            }
        });
        std::fs::write(&config_path, config.to_string()).expect("write config");

        Self {
            temp_dir,
            config_path,
        }
    }

    pub fn config_path(&self) -> &Utf8PathBuf {
        &self.config_path
    }

    pub fn installation(&self) -> PathBuf {
        self.temp_dir.path().join("alphacam")
    }

    pub fn workspace(&self) -> PathBuf {
        self.temp_dir.path().join("sdk")
    }

    pub fn install_component(&self, name: &str, version: &str) {
        std::fs::write(self.installation().join(name), pe_image(version))
            .expect("write component");
    }

    pub fn install_help(&self, name: &str) {
        std::fs::write(self.installation().join(name), b"ITSF").expect("write help file");
    }

    pub fn remove(&self, name: &str) {
        std::fs::remove_file(self.installation().join(name)).expect("remove artifact");
    }

    /// Builder for a facade requiring `components` and indexing `help`
    ///
    /// The first component backs the core and geometry interfaces, the last
    /// one backs automation.
    pub fn builder(&self, components: &[&str], help: &[&str]) -> SdkFacadeBuilder {
        let first = components.first().copied().unwrap_or("none");
        let last = components.last().copied().unwrap_or("none");
        SdkFacade::builder()
            .config_path(self.config_path.clone())
            .component_manifest(Manifest::from_names(
                ArtifactKind::Binary,
                components.iter().copied(),
            ))
            .help_manifest(Manifest::from_names(
                ArtifactKind::Documentation,
                help.iter().copied(),
            ))
            .capability_factory(Arc::new(ComponentBackedFactory::new(first, first, last)))
    }

    pub fn facade(&self, components: &[&str], help: &[&str]) -> SdkFacade {
        self.builder(components, help).build()
    }
}

/// File loader that takes `delay` for every component
pub struct SlowLoader {
    delay: Duration,
}

impl SlowLoader {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self { delay })
    }
}

impl ComponentLoader for SlowLoader {
    fn load(&self, path: &Path) -> Result<ComponentHandle, LoadError> {
        std::thread::sleep(self.delay);
        FileComponentLoader::new().load(path)
    }

    fn version_of(&self, handle: &ComponentHandle) -> Option<String> {
        FileComponentLoader::new().version_of(handle)
    }
}

pub fn exists(path: &Path) -> bool {
    path.is_file()
}
