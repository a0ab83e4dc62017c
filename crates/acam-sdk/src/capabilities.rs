//! Capability interfaces
//!
//! The SDK exposes ALPHACAM functionality only through opaque interfaces that
//! exist while the facade is ready. Each interface is backed by one
//! registered component. Hosts that bind to the live application plug in
//! their own [`CapabilityFactory`]; the default factory produces handles that
//! identify their backing component and nothing more.

use std::fmt;
use std::sync::Arc;

use acam_components::{ComponentHandle, ComponentRegistry};

use crate::error::{Result, SdkError};

/// Component backing the core interface by default
pub const DEFAULT_CORE_COMPONENT: &str = "ACAM.dll";
/// Component backing the geometry interface by default
pub const DEFAULT_GEOMETRY_COMPONENT: &str = "GeoTools.dll";
/// Component backing the automation interface by default
pub const DEFAULT_AUTOMATION_COMPONENT: &str = "ACAMAutomation.dll";

/// Common surface of every capability handle
pub trait Capability: Send + Sync + fmt::Debug {
    /// Name of the backing component
    fn component(&self) -> &str;

    /// Version of the backing component
    fn component_version(&self) -> &str;
}

/// Application, document and view control
pub trait CoreInterface: Capability {}

/// Geometry creation and queries
pub trait GeometryInterface: Capability {}

/// Macro and batch automation
pub trait AutomationInterface: Capability {}

/// The three interfaces handed out by a ready facade
#[derive(Clone, Debug)]
pub struct Capabilities {
    pub core: Arc<dyn CoreInterface>,
    pub geometry: Arc<dyn GeometryInterface>,
    pub automation: Arc<dyn AutomationInterface>,
}

/// Builds capability handles from a fully loaded registry
pub trait CapabilityFactory: Send + Sync {
    fn create(&self, registry: &ComponentRegistry) -> Result<Capabilities>;
}

/// Capability handle bound to a registered component
#[derive(Clone)]
pub struct ComponentCapability {
    component: String,
    version: String,
    handle: ComponentHandle,
}

impl ComponentCapability {
    fn bind(
        registry: &ComponentRegistry,
        capability: &'static str,
        component: &str,
    ) -> Result<Self> {
        let registered = registry
            .get(component)
            .ok_or_else(|| SdkError::CapabilityUnavailable {
                capability,
                component: component.to_string(),
            })?;

        Ok(Self {
            component: registered.name.clone(),
            version: registered.version_tag().to_string(),
            handle: registered.handle().clone(),
        })
    }

    /// Loaded handle of the backing component
    pub fn handle(&self) -> &ComponentHandle {
        &self.handle
    }
}

impl fmt::Debug for ComponentCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentCapability")
            .field("component", &self.component)
            .field("version", &self.version)
            .finish()
    }
}

impl Capability for ComponentCapability {
    fn component(&self) -> &str {
        &self.component
    }

    fn component_version(&self) -> &str {
        &self.version
    }
}

impl CoreInterface for ComponentCapability {}
impl GeometryInterface for ComponentCapability {}
impl AutomationInterface for ComponentCapability {}

/// Default factory binding each interface to a named component
#[derive(Debug, Clone)]
pub struct ComponentBackedFactory {
    core: String,
    geometry: String,
    automation: String,
}

impl ComponentBackedFactory {
    pub fn new(
        core: impl Into<String>,
        geometry: impl Into<String>,
        automation: impl Into<String>,
    ) -> Self {
        Self {
            core: core.into(),
            geometry: geometry.into(),
            automation: automation.into(),
        }
    }
}

impl Default for ComponentBackedFactory {
    fn default() -> Self {
        Self::new(
            DEFAULT_CORE_COMPONENT,
            DEFAULT_GEOMETRY_COMPONENT,
            DEFAULT_AUTOMATION_COMPONENT,
        )
    }
}

impl CapabilityFactory for ComponentBackedFactory {
    fn create(&self, registry: &ComponentRegistry) -> Result<Capabilities> {
        Ok(Capabilities {
            core: Arc::new(ComponentCapability::bind(registry, "core", &self.core)?),
            geometry: Arc::new(ComponentCapability::bind(
                registry,
                "geometry",
                &self.geometry,
            )?),
            automation: Arc::new(ComponentCapability::bind(
                registry,
                "automation",
                &self.automation,
            )?),
        })
    }
}
