//! Error types for artifact staging, component loading and index rendering

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A single artifact could not be staged
///
/// These never abort a sync batch; they are recorded per artifact in the
/// [`SyncReport`](crate::SyncReport).
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("artifact {name} not found at {path}")]
    ArtifactNotFound { name: String, path: PathBuf },

    #[error("failed to copy {name} to {path} after {attempts} attempt(s): {source}")]
    CopyFailed {
        name: String,
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    pub fn artifact_not_found(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::ArtifactNotFound {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn copy_failed(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        attempts: u32,
        source: std::io::Error,
    ) -> Self {
        Self::CopyFailed {
            name: name.into(),
            path: path.into(),
            attempts,
            source,
        }
    }
}

/// A staged component could not be loaded
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read component {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("component {path} is empty")]
    Empty { path: PathBuf },

    #[error("component {path} is not a PE image or type library")]
    UnrecognizedFormat { path: PathBuf },

    #[error("loading {path} timed out after {timeout:?}")]
    Timeout { path: PathBuf, timeout: Duration },

    #[error("loader for {path} aborted: {message}")]
    Aborted { path: PathBuf, message: String },

    #[error("failed to load {path}: {message}")]
    Other { path: PathBuf, message: String },
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Failure reported by a custom loader
    pub fn other(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Other {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Help index rendering or writing failed
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
