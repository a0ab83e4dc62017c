//! Status command - initialize the SDK and report readiness

use acam_components::OutputFormat;
use anyhow::{bail, Result};
use camino::Utf8Path;

use crate::cli::StatusArgs;

pub async fn run(args: StatusArgs, config: Option<&Utf8Path>) -> Result<()> {
    let sdk = super::facade(config);
    super::initialize(&sdk).await?;

    let format = match args.format.to_lowercase().as_str() {
        "json" => OutputFormat::Json,
        "yaml" | "yml" => OutputFormat::Yaml,
        _ => OutputFormat::Human,
    };

    let Some(report) = sdk.last_readiness_report().await else {
        bail!("No readiness report available");
    };
    println!("{}", report.format(format));

    // In CI mode, exit with appropriate code
    if args.ci {
        let exit_code = report.exit_code();
        if exit_code != 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
