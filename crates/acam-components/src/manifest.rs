//! Artifact manifests
//!
//! Static lists of the ALPHACAM artifacts the SDK stages into its workspace.
//! Binary components must all be registered before the SDK reports ready;
//! help files are staged when present and indexed for browsing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of artifact a manifest describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Loadable components (DLLs and type libraries)
    Binary,
    /// Compiled help files
    Documentation,
}

impl ArtifactKind {
    /// Directory under the workspace root where this kind is staged
    pub fn staging_dir(&self) -> &'static str {
        match self {
            ArtifactKind::Binary => "lib",
            ArtifactKind::Documentation => "help",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Binary => write!(f, "binary"),
            ArtifactKind::Documentation => write!(f, "documentation"),
        }
    }
}

/// Reporting group of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactGroup {
    /// Core application libraries
    Core,
    /// Automation and add-in hosting
    Automation,
    /// COM interop assemblies
    Interop,
    /// Supporting libraries
    Additional,
    /// Help files
    Help,
}

impl ArtifactGroup {
    /// Human-readable group name
    pub fn display_name(&self) -> &'static str {
        match self {
            ArtifactGroup::Core => "Core Components",
            ArtifactGroup::Automation => "Automation",
            ArtifactGroup::Interop => "Interop Assemblies",
            ArtifactGroup::Additional => "Additional Components",
            ArtifactGroup::Help => "Help Files",
        }
    }

    /// Reporting order
    pub fn all() -> &'static [ArtifactGroup] {
        &[
            ArtifactGroup::Core,
            ArtifactGroup::Automation,
            ArtifactGroup::Interop,
            ArtifactGroup::Additional,
            ArtifactGroup::Help,
        ]
    }
}

impl fmt::Display for ArtifactGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Compile-time description of a known artifact
#[derive(Debug, Clone, Copy)]
pub struct ArtifactSpec {
    /// File name, also the path relative to the installation root
    pub name: &'static str,

    /// Reporting group
    pub group: ArtifactGroup,

    /// One-line description
    pub description: &'static str,
}

/// Binary components required for readiness, in staging order
pub static REQUIRED_COMPONENTS: &[ArtifactSpec] = &[
    // ==========================================================================
    // Core
    // ==========================================================================
    ArtifactSpec {
        name: "ACAM.dll",
        group: ArtifactGroup::Core,
        description: "ALPHACAM application core",
    },
    ArtifactSpec {
        name: "AcamAddIns.dll",
        group: ArtifactGroup::Core,
        description: "Add-in host",
    },
    ArtifactSpec {
        name: "AcamAddInsInterface.dll",
        group: ArtifactGroup::Core,
        description: "Add-in interface definitions",
    },
    ArtifactSpec {
        name: "AcamDBWrapper.dll",
        group: ArtifactGroup::Core,
        description: "Database access wrapper",
    },
    ArtifactSpec {
        name: "AcamDBWrapper.tlb",
        group: ArtifactGroup::Core,
        description: "Database wrapper type library",
    },
    ArtifactSpec {
        name: "AlgoInterface.dll",
        group: ArtifactGroup::Core,
        description: "Toolpath algorithm interface",
    },
    ArtifactSpec {
        name: "GeoTools.dll",
        group: ArtifactGroup::Core,
        description: "Geometry toolkit",
    },
    ArtifactSpec {
        name: "GeoToolsCOM.dll",
        group: ArtifactGroup::Core,
        description: "Geometry toolkit COM bridge",
    },
    ArtifactSpec {
        name: "Primitives.dll",
        group: ArtifactGroup::Core,
        description: "Geometric primitives",
    },
    // ==========================================================================
    // Automation
    // ==========================================================================
    ArtifactSpec {
        name: "ACAMAutomation.dll",
        group: ArtifactGroup::Automation,
        description: "Automation object model",
    },
    ArtifactSpec {
        name: "LoadAddIn.dll",
        group: ArtifactGroup::Automation,
        description: "Add-in loader",
    },
    ArtifactSpec {
        name: "LoadAddIn.tlb",
        group: ArtifactGroup::Automation,
        description: "Add-in loader type library",
    },
    ArtifactSpec {
        name: "NestUtilities.dll",
        group: ArtifactGroup::Automation,
        description: "Nesting utilities",
    },
    ArtifactSpec {
        name: "Analytics.dll",
        group: ArtifactGroup::Automation,
        description: "Usage analytics",
    },
    ArtifactSpec {
        name: "AnalyticsCLR.dll",
        group: ArtifactGroup::Automation,
        description: "Usage analytics CLR bridge",
    },
    // ==========================================================================
    // Interop
    // ==========================================================================
    ArtifactSpec {
        name: "Interop.AlphaCAMFeature.dll",
        group: ArtifactGroup::Interop,
        description: "Feature interop assembly",
    },
    ArtifactSpec {
        name: "Interop.AlphaCAMGeoUtilities.dll",
        group: ArtifactGroup::Interop,
        description: "Geometry utilities interop assembly",
    },
    ArtifactSpec {
        name: "Interop.AlphaCAMMill.dll",
        group: ArtifactGroup::Interop,
        description: "Milling interop assembly",
    },
    ArtifactSpec {
        name: "Interop.AlphaCAMNesting.dll",
        group: ArtifactGroup::Interop,
        description: "Nesting interop assembly",
    },
    ArtifactSpec {
        name: "Interop.AlphaCAMParametric.dll",
        group: ArtifactGroup::Interop,
        description: "Parametric interop assembly",
    },
    ArtifactSpec {
        name: "Interop.AlphaCAMPrimitives.dll",
        group: ArtifactGroup::Interop,
        description: "Primitives interop assembly",
    },
    // ==========================================================================
    // Additional
    // ==========================================================================
    ArtifactSpec {
        name: "AcamAddInLoader32.dll",
        group: ArtifactGroup::Additional,
        description: "32-bit add-in loader",
    },
    ArtifactSpec {
        name: "AcamAddInsUtils.dll",
        group: ArtifactGroup::Additional,
        description: "Add-in utilities",
    },
    ArtifactSpec {
        name: "AcamWPFInterface.dll",
        group: ArtifactGroup::Additional,
        description: "WPF interface host",
    },
    ArtifactSpec {
        name: "AcamWPFInterface.tlb",
        group: ArtifactGroup::Additional,
        description: "WPF interface type library",
    },
    ArtifactSpec {
        name: "Feature.dll",
        group: ArtifactGroup::Additional,
        description: "Feature recognition",
    },
    ArtifactSpec {
        name: "HullLibrary.dll",
        group: ArtifactGroup::Additional,
        description: "Convex hull library",
    },
    ArtifactSpec {
        name: "MinimumBBox.dll",
        group: ArtifactGroup::Additional,
        description: "Minimum bounding box solver",
    },
    ArtifactSpec {
        name: "ApplicationInsightsHelper.dll",
        group: ArtifactGroup::Additional,
        description: "Telemetry helper",
    },
];

/// Help files staged into the workspace, in index order
pub static HELP_FILES: &[ArtifactSpec] = &[
    ArtifactSpec {
        name: "ACAM4.chm",
        group: ArtifactGroup::Help,
        description: "Main ALPHACAM help",
    },
    ArtifactSpec {
        name: "ACAM4LK.chm",
        group: ArtifactGroup::Help,
        description: "Licensing help",
    },
    ArtifactSpec {
        name: "ACAMAPI.chm",
        group: ArtifactGroup::Help,
        description: "API reference",
    },
    ArtifactSpec {
        name: "AcamReports.chm",
        group: ArtifactGroup::Help,
        description: "Reports help",
    },
    ArtifactSpec {
        name: "AEdit3.chm",
        group: ArtifactGroup::Help,
        description: "Editor help",
    },
    ArtifactSpec {
        name: "AEDITAPI.chm",
        group: ArtifactGroup::Help,
        description: "Editor API reference",
    },
    ArtifactSpec {
        name: "ConstraintsAPI.chm",
        group: ArtifactGroup::Help,
        description: "Constraints API reference",
    },
    ArtifactSpec {
        name: "Feature.chm",
        group: ArtifactGroup::Help,
        description: "Feature help",
    },
    ArtifactSpec {
        name: "ModuleWorks_-_Documentation.chm",
        group: ArtifactGroup::Help,
        description: "ModuleWorks documentation",
    },
    ArtifactSpec {
        name: "primitives.chm",
        group: ArtifactGroup::Help,
        description: "Primitives help",
    },
    ArtifactSpec {
        name: "R2V.chm",
        group: ArtifactGroup::Help,
        description: "Raster to vector help",
    },
];

/// One artifact to stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Stable name, also the file name inside the staging directory
    pub name: String,

    /// Path relative to the installation root
    pub source_relative_path: String,

    /// Reporting group
    pub group: ArtifactGroup,

    /// Optional one-line description
    pub description: Option<String>,
}

impl ManifestEntry {
    /// Create an entry whose source path equals its name
    pub fn new(name: impl Into<String>, group: ArtifactGroup) -> Self {
        let name = name.into();
        Self {
            source_relative_path: name.clone(),
            name,
            group,
            description: None,
        }
    }

    /// Override the path relative to the installation root
    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_relative_path = path.into();
        self
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl From<&ArtifactSpec> for ManifestEntry {
    fn from(spec: &ArtifactSpec) -> Self {
        ManifestEntry::new(spec.name, spec.group).with_description(spec.description)
    }
}

/// Ordered list of artifacts of one kind
///
/// Order is significant: sync results, readiness misses and rendered
/// documents all follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    kind: ArtifactKind,
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Build a manifest from explicit entries
    pub fn new(kind: ArtifactKind, entries: Vec<ManifestEntry>) -> Self {
        Self { kind, entries }
    }

    /// Build a manifest from bare names, source path equal to name
    pub fn from_names<I, S>(kind: ArtifactKind, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let group = match kind {
            ArtifactKind::Binary => ArtifactGroup::Additional,
            ArtifactKind::Documentation => ArtifactGroup::Help,
        };
        let entries = names
            .into_iter()
            .map(|name| ManifestEntry::new(name, group))
            .collect();
        Self { kind, entries }
    }

    /// The components that must all be registered for readiness
    pub fn required_components() -> Self {
        Self::new(
            ArtifactKind::Binary,
            REQUIRED_COMPONENTS.iter().map(ManifestEntry::from).collect(),
        )
    }

    /// The help files indexed by the SDK
    pub fn help_files() -> Self {
        Self::new(
            ArtifactKind::Documentation,
            HELP_FILES.iter().map(ManifestEntry::from).collect(),
        )
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Names in manifest order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
