//! CLI command implementations

pub mod help_files;
pub mod libraries;
pub mod status;
pub mod sync;
pub mod version;

use acam_sdk::{InitReport, SdkError, SdkFacade};
use anyhow::Result;
use camino::Utf8Path;

use crate::output;

/// Facade reading its configuration from `config`, or by discovery
pub(crate) fn facade(config: Option<&Utf8Path>) -> SdkFacade {
    let builder = SdkFacade::builder();
    match config {
        Some(path) => builder.config_path(path.to_owned()),
        None => builder,
    }
    .build()
}

/// Initialize `sdk` behind a spinner
///
/// Configuration and lifecycle errors are returned. Readiness failures are
/// reported as a warning and yield `None`, leaving the facade `Failed` with
/// its last readiness report available.
pub(crate) async fn initialize(sdk: &SdkFacade) -> Result<Option<InitReport>> {
    let spinner = output::spinner("Initializing ALPHACAM SDK...");
    let outcome = sdk.initialize().await;
    spinner.finish_and_clear();

    match outcome {
        Ok(report) => Ok(Some(report)),
        Err(SdkError::ConfigurationMissing(e)) => {
            Err(anyhow::Error::new(e).context("Failed to load SDK configuration"))
        }
        Err(e @ (SdkError::Cancelled | SdkError::InvalidState { .. })) => {
            Err(anyhow::Error::new(e).context("SDK initialization did not run"))
        }
        Err(e) => {
            output::warning(&e.to_string());
            Ok(None)
        }
    }
}
