//! Readiness reporter
//!
//! Renders the registry state against the required manifest as
//! human-readable text, JSON or YAML.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};

use crate::manifest::{ArtifactGroup, Manifest};
use crate::readiness::{ReadinessGate, ReadinessResult};
use crate::registry::ComponentRegistry;

/// Output format for readiness reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable colored output
    #[default]
    Human,
    /// JSON format for machine consumption
    Json,
    /// YAML format for machine consumption
    Yaml,
}

/// Registration status of one required component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Loaded,
    Missing,
}

/// One row of the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRow {
    pub name: String,
    pub group: ArtifactGroup,
    pub status: ComponentStatus,
    pub version: Option<String>,
    pub path: Option<PathBuf>,
}

/// Readiness plus per-component detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub generated_at: DateTime<Utc>,
    pub alphacam_version: Option<String>,
    pub ready: bool,
    pub missing: Vec<String>,
    pub components: Vec<ComponentRow>,
}

impl ReadinessReport {
    /// Build a report for `manifest` from the current registry contents
    pub fn build(manifest: &Manifest, registry: &ComponentRegistry) -> Self {
        let readiness = ReadinessGate::check_manifest(manifest, registry);

        let components = manifest
            .entries()
            .iter()
            .map(|entry| match registry.get(&entry.name) {
                Some(component) => ComponentRow {
                    name: entry.name.clone(),
                    group: entry.group,
                    status: ComponentStatus::Loaded,
                    version: Some(component.version_tag().to_string()),
                    path: Some(component.workspace_path.clone()),
                },
                None => ComponentRow {
                    name: entry.name.clone(),
                    group: entry.group,
                    status: ComponentStatus::Missing,
                    version: None,
                    path: None,
                },
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            alphacam_version: None,
            ready: readiness.all_present,
            missing: readiness.missing,
            components,
        }
    }

    pub fn with_alphacam_version(mut self, version: impl Into<String>) -> Self {
        self.alphacam_version = Some(version.into());
        self
    }

    pub fn result(&self) -> ReadinessResult {
        ReadinessResult {
            all_present: self.ready,
            missing: self.missing.clone(),
        }
    }

    /// Exit code for CI mode
    pub fn exit_code(&self) -> i32 {
        if self.ready {
            0
        } else {
            1
        }
    }

    pub fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Human => self.format_human(),
            OutputFormat::Json => serde_json::to_string_pretty(self)
                .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {}\"}}", e)),
            OutputFormat::Yaml => serde_yaml_ng::to_string(self)
                .unwrap_or_else(|e| format!("error: \"Failed to serialize: {}\"", e)),
        }
    }

    fn format_human(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", "ALPHACAM SDK Status".bold()));
        if let Some(version) = &self.alphacam_version {
            output.push_str(&format!("ALPHACAM version: {}\n", version));
        }
        output.push('\n');

        for group in ArtifactGroup::all() {
            let rows: Vec<&ComponentRow> = self
                .components
                .iter()
                .filter(|row| row.group == *group)
                .collect();

            if rows.is_empty() {
                continue;
            }

            output.push_str(&format!("{}\n", group.display_name().bold().underline()));
            for row in rows {
                output.push_str(&format_row(row));
            }
            output.push('\n');
        }

        output.push_str(&format!("{}\n", "Summary".bold().underline()));
        if self.ready {
            output.push_str(&format!(
                "  {} All {} required components loaded\n",
                "✓".green(),
                self.components.len()
            ));
        } else {
            output.push_str(&format!(
                "  {} {} of {} required component(s) missing\n",
                "✗".red(),
                self.missing.len(),
                self.components.len()
            ));
            output.push_str("  Check the ALPHACAM installation path and re-run.\n");
        }

        output
    }
}

fn format_row(row: &ComponentRow) -> String {
    match row.status {
        ComponentStatus::Loaded => {
            let version = row.version.as_deref().unwrap_or("-");
            let path = row
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            format!(
                "  {} {} {} - {}\n",
                "✓".green(),
                row.name.green(),
                version.dimmed(),
                path.dimmed()
            )
        }
        ComponentStatus::Missing => format!(
            "  {} {} - {}\n",
            "✗".red(),
            row.name.red(),
            "not loaded".dimmed()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::loader::{ComponentHandle, ComponentLoader};
    use crate::manifest::{ArtifactKind, ManifestEntry};
    use crate::sync::StagedArtifact;
    use std::path::Path;
    use std::sync::Arc;

    struct AcceptAll;

    impl ComponentLoader for AcceptAll {
        fn load(&self, _path: &Path) -> Result<ComponentHandle, LoadError> {
            Ok(ComponentHandle::new(()))
        }

        fn version_of(&self, _handle: &ComponentHandle) -> Option<String> {
            Some("4.5".to_string())
        }
    }

    async fn report_with(loaded: &[&str]) -> ReadinessReport {
        let manifest = Manifest::new(
            ArtifactKind::Binary,
            vec![
                ManifestEntry::new("ACAM.dll", ArtifactGroup::Core),
                ManifestEntry::new("Feature.dll", ArtifactGroup::Additional),
            ],
        );
        let mut registry = ComponentRegistry::new(&manifest, Arc::new(AcceptAll));
        let staged: Vec<StagedArtifact> = loaded
            .iter()
            .map(|n| StagedArtifact::new(*n, format!("/ws/lib/{}", n)))
            .collect();
        registry.load(&staged).await;
        ReadinessReport::build(&manifest, &registry)
    }

    #[tokio::test]
    async fn test_ready_report() {
        let report = report_with(&["ACAM.dll", "Feature.dll"])
            .await
            .with_alphacam_version("2023.1");

        assert!(report.ready);
        assert_eq!(report.exit_code(), 0);
        assert!(report.result().all_present);

        let text = report.format(OutputFormat::Human);
        assert!(text.contains("ALPHACAM version: 2023.1"));
        assert!(text.contains("Core Components"));
        assert!(text.contains("All 2 required components loaded"));
    }

    #[tokio::test]
    async fn test_missing_report() {
        let report = report_with(&["ACAM.dll"]).await;

        assert!(!report.ready);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.missing, vec!["Feature.dll"]);
        assert!(report
            .format(OutputFormat::Human)
            .contains("1 of 2 required component(s) missing"));
    }

    #[tokio::test]
    async fn test_json_and_yaml() {
        let report = report_with(&["ACAM.dll"]).await;

        let json: serde_json::Value =
            serde_json::from_str(&report.format(OutputFormat::Json)).unwrap();
        assert_eq!(json["ready"], false);
        assert_eq!(json["components"][0]["status"], "loaded");
        assert_eq!(json["components"][0]["version"], "4.5");
        assert_eq!(json["components"][1]["status"], "missing");

        let yaml = report.format(OutputFormat::Yaml);
        assert!(yaml.contains("missing:"));
        assert!(yaml.contains("- Feature.dll"));
    }
}
