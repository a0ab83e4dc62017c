//! SDK facade lifecycle
//!
//! One async mutex guards every transition, so concurrent callers see the
//! facade move through its states one step at a time. The current state is
//! also published on a watch channel for observers that must not block.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use acam_components::{
    ArtifactSyncer, ComponentLoader, ComponentRegistry, Manifest, ReadinessGate, ReadinessReport,
    ReadinessResult, RenderedOutputs, ResourceIndex, SyncReport, WorkspacePaths,
};
use acam_core::SdkConfig;
use tokio::sync::{watch, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::builder::{ConfigSource, SdkFacadeBuilder};
use crate::capabilities::{
    AutomationInterface, Capabilities, CapabilityFactory, CoreInterface, GeometryInterface,
};
use crate::error::{Result, SdkError};
use crate::state::SdkState;

/// Version of this SDK
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// What a successful `initialize` did
#[derive(Debug)]
pub struct InitReport {
    pub binaries: SyncReport,
    pub documentation: SyncReport,
    pub readiness: ReadinessResult,
    /// Rendered help outputs, absent when writing them failed
    pub rendered: Option<RenderedOutputs>,
}

/// Everything owned between `initialize` and `shutdown`
#[derive(Default)]
struct Session {
    config: Option<SdkConfig>,
    paths: Option<WorkspacePaths>,
    registry: Option<ComponentRegistry>,
    resources: Option<ResourceIndex>,
    rendered: Option<RenderedOutputs>,
    capabilities: Option<Capabilities>,
    readiness: Option<ReadinessResult>,
}

/// Entry point to the ALPHACAM SDK
///
/// Construct with [`SdkFacade::builder`]. Instances are independent: each owns
/// its workspace paths, registry and resource index.
pub struct SdkFacade {
    config_source: ConfigSource,
    components: Manifest,
    help_files: Manifest,
    loader: Arc<dyn ComponentLoader>,
    capability_factory: Arc<dyn CapabilityFactory>,
    cancel: CancellationToken,
    session: Mutex<Session>,
    state_tx: watch::Sender<SdkState>,
}

impl SdkFacade {
    pub fn builder() -> SdkFacadeBuilder {
        SdkFacadeBuilder::new()
    }

    pub(crate) fn from_parts(
        config_source: ConfigSource,
        components: Manifest,
        help_files: Manifest,
        loader: Arc<dyn ComponentLoader>,
        capability_factory: Arc<dyn CapabilityFactory>,
        cancel: CancellationToken,
    ) -> Self {
        let (state_tx, _) = watch::channel(SdkState::Uninitialized);
        Self {
            config_source,
            components,
            help_files,
            loader,
            capability_factory,
            cancel,
            session: Mutex::new(Session::default()),
            state_tx,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SdkState {
        *self.state_tx.borrow()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<SdkState> {
        self.state_tx.subscribe()
    }

    /// Version of this SDK, available in every state
    pub fn sdk_version(&self) -> &'static str {
        SDK_VERSION
    }

    /// Stage, register and verify the component set
    ///
    /// Allowed from `Uninitialized` and `Failed`. A call made while another
    /// `initialize` is running waits for it and then acts on the resulting
    /// state. Fails with [`SdkError::NotReady`] when required components are
    /// missing, leaving the facade `Failed`. Dropping the returned future
    /// before it completes also leaves the facade `Failed`.
    pub async fn initialize(&self) -> Result<InitReport> {
        let mut session = self.session.lock().await;

        let state = self.state();
        if !state.can_initialize() {
            return Err(SdkError::invalid_state("initialize", state));
        }

        release(&mut session);
        self.transition(SdkState::Initializing);
        let abandoned = AbandonGuard::new(self);

        let outcome = self.run_initialize(&mut session).await;
        abandoned.disarm();

        match outcome {
            Ok(report) => {
                self.transition(SdkState::Ready);
                Ok(report)
            }
            Err(e) => {
                warn!("SDK initialization failed: {}", e);
                session.capabilities = None;
                self.transition(SdkState::Failed);
                Err(e)
            }
        }
    }

    async fn run_initialize(&self, session: &mut Session) -> Result<InitReport> {
        let config = self.load_config()?;
        let settings = config.sync().clone();
        let paths = WorkspacePaths::new(
            config.installation_root().as_std_path(),
            config.workspace_root().as_std_path(),
        );
        info!(
            "Initializing ALPHACAM SDK {} for ALPHACAM {} (installation: {}, workspace: {})",
            SDK_VERSION,
            config.alphacam_version(),
            paths.source_root().display(),
            paths.workspace_root().display()
        );
        session.config = Some(config);

        let syncer =
            ArtifactSyncer::from_settings(&settings).with_cancellation(self.cancel.clone());

        let binaries = syncer.sync(&paths, &self.components).await;
        if self.cancel.is_cancelled() {
            return Err(SdkError::Cancelled);
        }

        let mut registry = ComponentRegistry::new(&self.components, Arc::clone(&self.loader))
            .with_load_timeout(Duration::from_secs(settings.load_timeout_secs.max(1)));
        registry.load(&binaries.staged()).await;

        let readiness = ReadinessGate::check_manifest(&self.components, &registry);
        session.readiness = Some(readiness.clone());
        let bound = if readiness.all_present {
            Some(self.capability_factory.create(&registry))
        } else {
            None
        };
        session.registry = Some(registry);
        session.paths = Some(paths.clone());

        if !readiness.all_present {
            warn!(
                "{} required component(s) missing: {}",
                readiness.missing.len(),
                readiness.missing.join(", ")
            );
            return Err(SdkError::not_ready(readiness.missing));
        }
        if let Some(bound) = bound {
            session.capabilities = Some(bound?);
        }

        let documentation = syncer.sync(&paths, &self.help_files).await;
        if self.cancel.is_cancelled() {
            return Err(SdkError::Cancelled);
        }

        let mut resources = ResourceIndex::new(&self.help_files)?;
        resources.build(&documentation.staged());
        let rendered = match resources.write_outputs(paths.workspace_root()).await {
            Ok(rendered) => Some(rendered),
            Err(e) => {
                warn!("Failed to write help index: {}", e);
                None
            }
        };
        session.resources = Some(resources);
        session.rendered = rendered.clone();

        info!(
            "ALPHACAM SDK ready: {} components, {} help files",
            self.components.len(),
            documentation.staged().len()
        );

        Ok(InitReport {
            binaries,
            documentation,
            readiness,
            rendered,
        })
    }

    fn load_config(&self) -> Result<SdkConfig> {
        let config = match &self.config_source {
            ConfigSource::Discover => SdkConfig::load(None)?,
            ConfigSource::Path(path) => SdkConfig::load(Some(path.as_path()))?,
            ConfigSource::Inline(config) => config.clone(),
        };
        debug!("Using configuration {}", config.config_path);
        Ok(config)
    }

    /// Release capabilities, unload every component and return to
    /// `Uninitialized`
    pub async fn shutdown(&self) -> Result<()> {
        let mut session = self.session.lock().await;

        let state = self.state();
        if !state.can_shutdown() {
            return Err(SdkError::invalid_state("shutdown", state));
        }

        release(&mut session);
        self.transition(SdkState::Uninitialized);
        Ok(())
    }

    pub async fn core_interface(&self) -> Result<Arc<dyn CoreInterface>> {
        let session = self.ready_session("get the core interface").await?;
        Ok(Arc::clone(&capabilities(&session)?.core))
    }

    pub async fn geometry_interface(&self) -> Result<Arc<dyn GeometryInterface>> {
        let session = self.ready_session("get the geometry interface").await?;
        Ok(Arc::clone(&capabilities(&session)?.geometry))
    }

    pub async fn automation_interface(&self) -> Result<Arc<dyn AutomationInterface>> {
        let session = self.ready_session("get the automation interface").await?;
        Ok(Arc::clone(&capabilities(&session)?.automation))
    }

    /// ALPHACAM version named in the configuration
    pub async fn alphacam_version(&self) -> Result<String> {
        let session = self.ready_session("read the ALPHACAM version").await?;
        Ok(session
            .config
            .as_ref()
            .map(|c| c.alphacam_version().to_string())
            .unwrap_or_default())
    }

    /// Name to version of every loaded component
    pub async fn loaded_libraries(&self) -> Result<BTreeMap<String, String>> {
        let session = self.ready_session("list loaded libraries").await?;
        Ok(session
            .registry
            .as_ref()
            .map(ComponentRegistry::all_versions)
            .unwrap_or_default())
    }

    pub async fn is_library_loaded(&self, name: &str) -> Result<bool> {
        let session = self.ready_session("query a library").await?;
        Ok(session
            .registry
            .as_ref()
            .is_some_and(|r| r.is_loaded(name)))
    }

    /// Version of a component, `"unknown"` when not loaded or unversioned
    pub async fn library_version(&self, name: &str) -> Result<String> {
        let session = self.ready_session("query a library version").await?;
        Ok(session
            .registry
            .as_ref()
            .map(|r| r.version(name))
            .unwrap_or_else(|| acam_components::UNKNOWN_VERSION.to_string()))
    }

    /// Staged help files as name and workspace path, in index order
    pub async fn help_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let session = self.ready_session("list help files").await?;
        Ok(session
            .resources
            .as_ref()
            .map(|index| {
                index
                    .all()
                    .iter()
                    .map(|e| (e.name.clone(), e.workspace_path.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    pub async fn help_file_path(&self, name: &str) -> Result<Option<PathBuf>> {
        let session = self.ready_session("look up a help file").await?;
        Ok(session
            .resources
            .as_ref()
            .and_then(|index| index.get(name))
            .map(|p| p.to_path_buf()))
    }

    /// Rendered HTML help index, when it was written
    pub async fn help_index_path(&self) -> Result<Option<PathBuf>> {
        let session = self.ready_session("locate the help index").await?;
        Ok(session.rendered.as_ref().map(|r| r.index_path.clone()))
    }

    /// Workspace and installation roots of the running session
    pub async fn workspace_paths(&self) -> Result<WorkspacePaths> {
        let session = self.ready_session("read workspace paths").await?;
        session
            .paths
            .clone()
            .ok_or_else(|| SdkError::invalid_state("read workspace paths", SdkState::Ready))
    }

    /// Readiness of the running session
    pub async fn readiness(&self) -> Result<ReadinessResult> {
        let session = self.ready_session("check readiness").await?;
        Ok(session.readiness.clone().unwrap_or(ReadinessResult {
            all_present: true,
            missing: Vec::new(),
        }))
    }

    /// Per-component readiness report of the running session
    pub async fn readiness_report(&self) -> Result<ReadinessReport> {
        let session = self.ready_session("build a readiness report").await?;
        self.build_report(&session)
            .ok_or_else(|| SdkError::invalid_state("build a readiness report", SdkState::Ready))
    }

    /// Result of the last readiness check, kept after a failed `initialize`
    pub async fn last_readiness(&self) -> Option<ReadinessResult> {
        self.session.lock().await.readiness.clone()
    }

    /// Report for the last `initialize`, whether it succeeded or not
    pub async fn last_readiness_report(&self) -> Option<ReadinessReport> {
        let session = self.session.lock().await;
        self.build_report(&session)
    }

    fn build_report(&self, session: &Session) -> Option<ReadinessReport> {
        let report = ReadinessReport::build(&self.components, session.registry.as_ref()?);
        Some(match &session.config {
            Some(config) => report.with_alphacam_version(config.alphacam_version()),
            None => report,
        })
    }

    async fn ready_session(&self, operation: &'static str) -> Result<MutexGuard<'_, Session>> {
        let state = self.state();
        if state != SdkState::Ready {
            return Err(SdkError::invalid_state(operation, state));
        }

        let session = self.session.lock().await;
        let state = self.state();
        if state != SdkState::Ready {
            return Err(SdkError::invalid_state(operation, state));
        }
        Ok(session)
    }

    fn transition(&self, next: SdkState) {
        let previous = self.state_tx.send_replace(next);
        if previous != next {
            info!("SDK state: {} -> {}", previous, next);
        }
    }
}

impl std::fmt::Debug for SdkFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkFacade")
            .field("state", &self.state())
            .field("components", &self.components.len())
            .field("help_files", &self.help_files.len())
            .finish()
    }
}

/// Moves the facade to `Failed` if an `initialize` future is dropped while
/// `Initializing`
struct AbandonGuard<'a> {
    facade: &'a SdkFacade,
    armed: bool,
}

impl<'a> AbandonGuard<'a> {
    fn new(facade: &'a SdkFacade) -> Self {
        Self {
            facade,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("SDK initialization was abandoned before it finished");
            self.facade.transition(SdkState::Failed);
        }
    }
}

fn capabilities(session: &Session) -> Result<&Capabilities> {
    session
        .capabilities
        .as_ref()
        .ok_or_else(|| SdkError::invalid_state("use capabilities", SdkState::Ready))
}

/// Drop capabilities and unload every component
fn release(session: &mut Session) {
    session.capabilities = None;
    if let Some(registry) = session.registry.as_mut() {
        registry.unload_all();
    }
    *session = Session::default();
}
