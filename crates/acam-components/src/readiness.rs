//! Readiness gate
//!
//! The single authority on whether the workspace may be used: every name in
//! the required manifest must be registered.

use serde::{Deserialize, Serialize};

use crate::manifest::Manifest;
use crate::registry::ComponentRegistry;

/// Outcome of a readiness check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResult {
    /// True iff `missing` is empty
    pub all_present: bool,
    /// Required names that are not registered, in manifest order
    pub missing: Vec<String>,
}

impl ReadinessResult {
    pub fn is_ready(&self) -> bool {
        self.all_present
    }
}

/// Compares a registry against a required manifest
pub struct ReadinessGate;

impl ReadinessGate {
    /// Check `required` names against `registry`
    ///
    /// Repeated names are reported once, at their first position.
    pub fn check<S: AsRef<str>>(required: &[S], registry: &ComponentRegistry) -> ReadinessResult {
        let mut missing: Vec<String> = Vec::new();
        for name in required {
            let name = name.as_ref();
            if !registry.is_loaded(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }

        ReadinessResult {
            all_present: missing.is_empty(),
            missing,
        }
    }

    /// Check every entry of `manifest`
    pub fn check_manifest(manifest: &Manifest, registry: &ComponentRegistry) -> ReadinessResult {
        Self::check(&manifest.names(), registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::FileComponentLoader;
    use crate::manifest::ArtifactKind;
    use std::sync::Arc;

    #[test]
    fn test_empty_registry_misses_everything() {
        let manifest = Manifest::from_names(ArtifactKind::Binary, ["A.dll", "B.dll"]);
        let registry = ComponentRegistry::new(&manifest, Arc::new(FileComponentLoader::new()));

        let result = ReadinessGate::check_manifest(&manifest, &registry);

        assert!(!result.all_present);
        assert_eq!(result.missing, vec!["A.dll", "B.dll"]);
    }

    #[test]
    fn test_empty_manifest_is_ready() {
        let manifest = Manifest::from_names(ArtifactKind::Binary, Vec::<String>::new());
        let registry = ComponentRegistry::new(&manifest, Arc::new(FileComponentLoader::new()));

        let result = ReadinessGate::check_manifest(&manifest, &registry);

        assert!(result.is_ready());
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_duplicate_names_reported_once() {
        let manifest = Manifest::from_names(ArtifactKind::Binary, ["A.dll"]);
        let registry = ComponentRegistry::new(&manifest, Arc::new(FileComponentLoader::new()));

        let result = ReadinessGate::check(&["A.dll", "A.dll"], &registry);

        assert_eq!(result.missing, vec!["A.dll"]);
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = ReadinessResult {
            all_present: false,
            missing: vec!["B.dll".to_string()],
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"allPresent":false,"missing":["B.dll"]}"#);
    }
}
