//! Source and workspace roots

use std::path::{Path, PathBuf};

use crate::manifest::{ArtifactKind, ManifestEntry};

/// Where artifacts are read from and where they are staged to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    source_root: PathBuf,
    workspace_root: PathBuf,
}

impl WorkspacePaths {
    pub fn new(source_root: impl Into<PathBuf>, workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            workspace_root: workspace_root.into(),
        }
    }

    /// ALPHACAM installation directory
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// SDK workspace directory
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Directory an artifact kind is staged into
    pub fn staging_dir(&self, kind: ArtifactKind) -> PathBuf {
        self.workspace_root.join(kind.staging_dir())
    }

    /// Source file of a manifest entry
    pub fn source_path(&self, entry: &ManifestEntry) -> PathBuf {
        self.source_root.join(&entry.source_relative_path)
    }

    /// Staged location of a manifest entry
    pub fn target_path(&self, kind: ArtifactKind, entry: &ManifestEntry) -> PathBuf {
        self.staging_dir(kind).join(&entry.name)
    }
}
