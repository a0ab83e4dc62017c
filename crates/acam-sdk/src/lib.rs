//! ALPHACAM SDK facade
//!
//! [`SdkFacade`] stages the ALPHACAM component set into the SDK workspace,
//! registers it, and hands out capability interfaces only once every
//! required component is loaded.
//!
//! ```text
//! Uninitialized ──initialize──▶ Initializing ──▶ Ready
//!       ▲                             │
//!       │                             └────────▶ Failed
//!       └──────────── shutdown ◀──── Ready | Failed
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use acam_sdk::SdkFacade;
//!
//! # async fn example() -> Result<(), acam_sdk::SdkError> {
//! let sdk = SdkFacade::builder().config_path("sdk_config.json").build();
//!
//! sdk.initialize().await?;
//! let core = sdk.core_interface().await?;
//! println!("{} {}", core.component(), core.component_version());
//!
//! for (name, version) in sdk.loaded_libraries().await? {
//!     println!("{name}: {version}");
//! }
//! sdk.shutdown().await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod capabilities;
mod error;
mod facade;
mod state;

pub use builder::{ConfigSource, SdkFacadeBuilder};
pub use capabilities::{
    AutomationInterface, Capabilities, Capability, CapabilityFactory, ComponentBackedFactory,
    ComponentCapability, CoreInterface, GeometryInterface, DEFAULT_AUTOMATION_COMPONENT,
    DEFAULT_CORE_COMPONENT, DEFAULT_GEOMETRY_COMPONENT,
};
pub use error::{Result, SdkError};
pub use facade::{InitReport, SdkFacade, SDK_VERSION};
pub use state::SdkState;
