//! Facade lifecycle states

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of an [`SdkFacade`](crate::SdkFacade)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdkState {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

impl SdkState {
    /// Whether `initialize` may start from this state
    pub fn can_initialize(&self) -> bool {
        matches!(self, SdkState::Uninitialized | SdkState::Failed)
    }

    /// Whether `shutdown` may run from this state
    pub fn can_shutdown(&self) -> bool {
        matches!(self, SdkState::Ready | SdkState::Failed)
    }
}

impl fmt::Display for SdkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SdkState::Uninitialized => "uninitialized",
            SdkState::Initializing => "initializing",
            SdkState::Ready => "ready",
            SdkState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permitted_transitions() {
        assert!(SdkState::Uninitialized.can_initialize());
        assert!(SdkState::Failed.can_initialize());
        assert!(!SdkState::Ready.can_initialize());
        assert!(!SdkState::Initializing.can_initialize());

        assert!(SdkState::Ready.can_shutdown());
        assert!(SdkState::Failed.can_shutdown());
        assert!(!SdkState::Uninitialized.can_shutdown());
        assert!(!SdkState::Initializing.can_shutdown());
    }

    #[test]
    fn test_display() {
        assert_eq!(SdkState::Ready.to_string(), "ready");
        assert_eq!(SdkState::default(), SdkState::Uninitialized);
    }
}
