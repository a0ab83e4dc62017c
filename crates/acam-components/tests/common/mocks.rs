//! Mock component loaders

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use acam_components::{ComponentHandle, ComponentLoader, LoadError};

/// Loader that accepts every path, refuses configured file names, and
/// records what it was asked to load
#[derive(Default)]
pub struct MockLoader {
    refused: HashSet<String>,
    version: Option<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<PathBuf>>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing(mut self, name: &str) -> Self {
        self.refused.insert(name.to_string());
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Sleep inside `load`, simulating a hung component
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl ComponentLoader for MockLoader {
    fn load(&self, path: &Path) -> Result<ComponentHandle, LoadError> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if self.refused.contains(&name) {
            return Err(LoadError::other(path, "refused by mock"));
        }
        Ok(ComponentHandle::new(name))
    }

    fn version_of(&self, _handle: &ComponentHandle) -> Option<String> {
        self.version.clone()
    }
}
