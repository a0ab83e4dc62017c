//! Facade construction

use std::sync::Arc;

use acam_components::{ComponentLoader, FileComponentLoader, Manifest};
use acam_core::SdkConfig;
use camino::Utf8PathBuf;
use tokio_util::sync::CancellationToken;

use crate::capabilities::{CapabilityFactory, ComponentBackedFactory};
use crate::facade::SdkFacade;

/// Where `initialize` gets its configuration
#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    /// `ACAM_SDK_CONFIG`, then `sdk_config.json` beside the executable, then
    /// the current directory and its parents
    #[default]
    Discover,
    /// An explicit configuration file
    Path(Utf8PathBuf),
    /// An already loaded configuration
    Inline(SdkConfig),
}

/// Builder for [`SdkFacade`]
///
/// Every setting has a production default; tests replace manifests and the
/// loader to build isolated scenarios.
pub struct SdkFacadeBuilder {
    config: ConfigSource,
    components: Manifest,
    help_files: Manifest,
    loader: Arc<dyn ComponentLoader>,
    capabilities: Arc<dyn CapabilityFactory>,
    cancel: CancellationToken,
}

impl Default for SdkFacadeBuilder {
    fn default() -> Self {
        Self {
            config: ConfigSource::Discover,
            components: Manifest::required_components(),
            help_files: Manifest::help_files(),
            loader: Arc::new(FileComponentLoader::new()),
            capabilities: Arc::new(ComponentBackedFactory::default()),
            cancel: CancellationToken::new(),
        }
    }
}

impl SdkFacadeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from `path`
    pub fn config_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.config = ConfigSource::Path(path.into());
        self
    }

    /// Use an already loaded configuration
    pub fn config(mut self, config: SdkConfig) -> Self {
        self.config = ConfigSource::Inline(config);
        self
    }

    pub fn config_source(mut self, source: ConfigSource) -> Self {
        self.config = source;
        self
    }

    /// Replace the required component manifest
    pub fn component_manifest(mut self, manifest: Manifest) -> Self {
        self.components = manifest;
        self
    }

    /// Replace the help file manifest
    pub fn help_manifest(mut self, manifest: Manifest) -> Self {
        self.help_files = manifest;
        self
    }

    pub fn loader(mut self, loader: Arc<dyn ComponentLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn capability_factory(mut self, factory: Arc<dyn CapabilityFactory>) -> Self {
        self.capabilities = factory;
        self
    }

    /// Token that stops an in-flight sync between artifacts
    ///
    /// The token belongs to the facade for its whole life. Once cancelled,
    /// every later `initialize` also fails with
    /// [`SdkError::Cancelled`](crate::SdkError::Cancelled); build a new facade
    /// to start over.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn build(self) -> SdkFacade {
        SdkFacade::from_parts(
            self.config,
            self.components,
            self.help_files,
            self.loader,
            self.capabilities,
            self.cancel,
        )
    }
}
