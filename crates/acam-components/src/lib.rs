//! ALPHACAM component staging and registration
//!
//! This crate decides which ALPHACAM artifacts must be staged into the SDK
//! workspace, keeps the staged copies fresh, registers binary components so
//! their versions can be queried, and reports whether the workspace is ready.
//!
//! # Pipeline
//!
//! - [`ArtifactSyncer`] copies missing or stale artifacts from the
//!   installation into the workspace, tolerating absent optional files
//! - [`ComponentRegistry`] loads staged binaries through a
//!   [`ComponentLoader`] and records their versions
//! - [`ResourceIndex`] collects staged help files and renders an HTML index
//!   plus a markdown overview
//! - [`ReadinessGate`] compares the registry against the required manifest
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use acam_components::{
//!     ArtifactSyncer, ComponentRegistry, FileComponentLoader, Manifest, ReadinessGate,
//!     WorkspacePaths,
//! };
//!
//! # async fn example() {
//! let paths = WorkspacePaths::new("/opt/alphacam", "/srv/acam-sdk");
//! let manifest = Manifest::required_components();
//!
//! let report = ArtifactSyncer::new().sync(&paths, &manifest).await;
//! let mut registry = ComponentRegistry::new(&manifest, Arc::new(FileComponentLoader::new()));
//! registry.load(&report.staged()).await;
//!
//! let readiness = ReadinessGate::check_manifest(&manifest, &registry);
//! println!("ready: {}, missing: {:?}", readiness.all_present, readiness.missing);
//! # }
//! ```

mod error;
mod loader;
mod manifest;
mod readiness;
mod registry;
mod reporter;
mod resource_index;
mod sync;
mod workspace;

pub use error::{IndexError, LoadError, SyncError};
pub use loader::{ComponentHandle, ComponentLoader, FileComponentLoader, ImageKind, LoadedImage};
pub use manifest::{
    ArtifactGroup, ArtifactKind, ArtifactSpec, Manifest, ManifestEntry, HELP_FILES,
    REQUIRED_COMPONENTS,
};
pub use readiness::{ReadinessGate, ReadinessResult};
pub use registry::{ComponentRegistry, RegisteredComponent, UNKNOWN_VERSION};
pub use reporter::{ComponentRow, ComponentStatus, OutputFormat, ReadinessReport};
pub use resource_index::{DocEntry, RenderedOutputs, ResourceIndex};
pub use sync::{ArtifactSyncResult, ArtifactSyncer, StagedArtifact, SyncOutcome, SyncReport};
pub use workspace::WorkspacePaths;
