//! Component registry
//!
//! Records every staged binary component under its manifest name together
//! with its version and loaded handle.
//!
//! [`ComponentRegistry::load`] always reports success: individual load
//! failures are logged and simply leave the component unregistered. Whether
//! the registry is complete is decided by [`ReadinessGate`](crate::ReadinessGate),
//! never by the return value of `load`.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::loader::{ComponentHandle, ComponentLoader};
use crate::manifest::Manifest;
use crate::sync::StagedArtifact;

/// Version reported for components without an embedded version
pub const UNKNOWN_VERSION: &str = "unknown";

const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// A loaded component
#[derive(Debug, Clone)]
pub struct RegisteredComponent {
    pub name: String,
    pub workspace_path: PathBuf,
    pub version: Option<String>,
    pub loaded_at: DateTime<Utc>,
    handle: ComponentHandle,
}

impl RegisteredComponent {
    /// Version tag, `"unknown"` when the component has none
    pub fn version_tag(&self) -> &str {
        self.version.as_deref().unwrap_or(UNKNOWN_VERSION)
    }

    pub fn handle(&self) -> &ComponentHandle {
        &self.handle
    }
}

/// Name-keyed registry of loaded components
pub struct ComponentRegistry {
    manifest_names: Vec<String>,
    loader: Arc<dyn ComponentLoader>,
    load_timeout: Duration,
    components: HashMap<String, RegisteredComponent>,
    initialized: bool,
}

impl ComponentRegistry {
    /// Create an empty registry accepting the names in `manifest`
    pub fn new(manifest: &Manifest, loader: Arc<dyn ComponentLoader>) -> Self {
        Self {
            manifest_names: manifest.entries().iter().map(|e| e.name.clone()).collect(),
            loader,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            components: HashMap::new(),
            initialized: false,
        }
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    /// Load staged components, replacing any previous entry with the same name
    ///
    /// Always returns `true`. Failures are logged per component and the
    /// batch continues; consult the readiness gate for the actual outcome.
    pub async fn load(&mut self, staged: &[StagedArtifact]) -> bool {
        let mut accepted: Vec<&StagedArtifact> = Vec::with_capacity(staged.len());
        for artifact in staged {
            if !self.manifest_names.iter().any(|n| *n == artifact.name) {
                warn!(
                    "Refusing to register {}: not a required component",
                    artifact.name
                );
                continue;
            }
            if accepted.iter().any(|a| a.name == artifact.name) {
                warn!("Ignoring duplicate staged entry for {}", artifact.name);
                continue;
            }
            accepted.push(artifact);
        }

        let loads = accepted.iter().map(|artifact| {
            let loader = Arc::clone(&self.loader);
            let path = artifact.path.clone();
            load_component(loader, path, self.load_timeout)
        });
        let outcomes = join_all(loads).await;

        let mut loaded = 0;
        for (artifact, outcome) in accepted.into_iter().zip(outcomes) {
            match outcome {
                Ok((handle, version)) => {
                    debug!(
                        "Registered {} ({})",
                        artifact.name,
                        version.as_deref().unwrap_or(UNKNOWN_VERSION)
                    );
                    self.components.insert(
                        artifact.name.clone(),
                        RegisteredComponent {
                            name: artifact.name.clone(),
                            workspace_path: artifact.path.clone(),
                            version,
                            loaded_at: Utc::now(),
                            handle,
                        },
                    );
                    loaded += 1;
                }
                Err(e) => warn!("Failed to load {}: {}", artifact.name, e),
            }
        }

        self.initialized = true;
        info!(
            "Component registry holds {} of {} required components ({} loaded in this pass)",
            self.components.len(),
            self.manifest_names.len(),
            loaded
        );
        true
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Version of a registered component, `"unknown"` otherwise
    pub fn version(&self, name: &str) -> String {
        self.components
            .get(name)
            .map(|c| c.version_tag().to_string())
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string())
    }

    /// Name to version for every registered component
    pub fn all_versions(&self) -> BTreeMap<String, String> {
        self.components
            .values()
            .map(|c| (c.name.clone(), c.version_tag().to_string()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredComponent> {
        self.components.get(name)
    }

    /// Registered names in manifest order
    pub fn loaded_names(&self) -> Vec<&str> {
        self.manifest_names
            .iter()
            .filter(|n| self.components.contains_key(n.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Names this registry accepts, in manifest order
    pub fn manifest_names(&self) -> &[String] {
        &self.manifest_names
    }

    /// Drop every component and return to the uninitialized state
    pub fn unload_all(&mut self) {
        let count = self.components.len();
        self.components.clear();
        self.initialized = false;
        debug!("Unloaded {} component(s)", count);
    }

    /// Whether `load` has run since construction or the last `unload_all`
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("manifest_names", &self.manifest_names)
            .field("loaded", &self.loaded_names())
            .field("initialized", &self.initialized)
            .finish()
    }
}

/// Run a loader call on the blocking pool, bounded by `timeout`
async fn load_component(
    loader: Arc<dyn ComponentLoader>,
    path: PathBuf,
    timeout: Duration,
) -> Result<(ComponentHandle, Option<String>), LoadError> {
    let task_path = path.clone();
    let task = tokio::task::spawn_blocking(move || -> Result<_, LoadError> {
        let handle = loader.load(&task_path)?;
        let version = loader.version_of(&handle);
        Ok((handle, version))
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(LoadError::Aborted {
            path,
            message: join_error.to_string(),
        }),
        Err(_) => Err(LoadError::Timeout { path, timeout }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ArtifactKind;
    use std::path::Path;

    /// Loads anything whose file name does not start with "bad"
    struct StubLoader;

    impl ComponentLoader for StubLoader {
        fn load(&self, path: &Path) -> Result<ComponentHandle, LoadError> {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with("bad") {
                return Err(LoadError::other(path, "stub refused"));
            }
            Ok(ComponentHandle::new(name.to_string()))
        }

        fn version_of(&self, handle: &ComponentHandle) -> Option<String> {
            let name = handle.downcast_ref::<String>()?;
            name.starts_with('V').then(|| "1.2.3".to_string())
        }
    }

    fn registry(names: &[&str]) -> ComponentRegistry {
        let manifest = Manifest::from_names(ArtifactKind::Binary, names.iter().copied());
        ComponentRegistry::new(&manifest, Arc::new(StubLoader))
    }

    fn staged(name: &str) -> StagedArtifact {
        StagedArtifact::new(name, format!("/ws/lib/{}", name))
    }

    #[tokio::test]
    async fn test_load_registers_components() {
        let mut registry = registry(&["A.dll", "V.dll"]);
        assert!(!registry.is_initialized());

        assert!(registry.load(&[staged("A.dll"), staged("V.dll")]).await);

        assert!(registry.is_initialized());
        assert!(registry.is_loaded("A.dll"));
        assert_eq!(registry.version("A.dll"), UNKNOWN_VERSION);
        assert_eq!(registry.version("V.dll"), "1.2.3");
        assert_eq!(registry.loaded_names(), vec!["A.dll", "V.dll"]);
        assert_eq!(
            registry.get("A.dll").unwrap().workspace_path,
            PathBuf::from("/ws/lib/A.dll")
        );
    }

    #[tokio::test]
    async fn test_load_failure_still_returns_true() {
        let mut registry = registry(&["A.dll", "bad.dll"]);

        assert!(registry.load(&[staged("A.dll"), staged("bad.dll")]).await);

        assert!(registry.is_loaded("A.dll"));
        assert!(!registry.is_loaded("bad.dll"));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_orphans_are_rejected() {
        let mut registry = registry(&["A.dll"]);

        registry.load(&[staged("A.dll"), staged("Stray.dll")]).await;

        assert!(!registry.is_loaded("Stray.dll"));
        assert_eq!(registry.all_versions().len(), 1);
    }

    #[tokio::test]
    async fn test_reload_replaces_entry() {
        let mut registry = registry(&["A.dll"]);
        registry.load(&[staged("A.dll")]).await;

        registry
            .load(&[StagedArtifact::new("A.dll", "/elsewhere/A.dll")])
            .await;

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("A.dll").unwrap().workspace_path,
            PathBuf::from("/elsewhere/A.dll")
        );
    }

    #[tokio::test]
    async fn test_unload_all_resets() {
        let mut registry = registry(&["A.dll"]);
        registry.load(&[staged("A.dll")]).await;

        registry.unload_all();

        assert!(registry.is_empty());
        assert!(!registry.is_initialized());
        assert!(!registry.is_loaded("A.dll"));
    }

    #[test]
    fn test_version_of_unregistered_name() {
        let registry = registry(&["A.dll"]);
        assert_eq!(registry.version("Nope.dll"), UNKNOWN_VERSION);
        assert!(registry.get("Nope.dll").is_none());
    }
}
