//! Facade error taxonomy

use acam_components::IndexError;
use thiserror::Error;

use crate::state::SdkState;

/// Errors returned by [`SdkFacade`](crate::SdkFacade)
///
/// Per-artifact problems (missing sources, failed copies, unloadable
/// components) never surface here; they are recorded in the sync reports of
/// [`InitReport`](crate::InitReport) and summed up by [`SdkError::NotReady`].
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration could not be found, parsed or validated
    #[error("SDK configuration unavailable: {0}")]
    ConfigurationMissing(#[from] acam_core::Error),

    /// Initialization finished without every required component
    #[error("SDK is not ready; missing components: {}", .missing.join(", "))]
    NotReady { missing: Vec<String> },

    /// Operation is not permitted in the current lifecycle state
    #[error("cannot {operation} while the SDK is {state}")]
    InvalidState {
        operation: &'static str,
        state: SdkState,
    },

    /// A capability's backing component is not registered
    #[error("{capability} interface requires component {component}, which is not loaded")]
    CapabilityUnavailable {
        capability: &'static str,
        component: String,
    },

    /// Help index templates failed to load
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Initialization was cancelled
    #[error("SDK initialization was cancelled")]
    Cancelled,
}

impl SdkError {
    pub fn invalid_state(operation: &'static str, state: SdkState) -> Self {
        Self::InvalidState { operation, state }
    }

    pub fn not_ready(missing: Vec<String>) -> Self {
        Self::NotReady { missing }
    }

    /// Missing component names, when initialization failed readiness
    pub fn missing_components(&self) -> Option<&[String]> {
        match self {
            Self::NotReady { missing } => Some(missing),
            _ => None,
        }
    }
}

/// Result type for facade operations
pub type Result<T> = std::result::Result<T, SdkError>;
