//! Version command

use acam_core::SdkConfig;
use anyhow::Result;
use camino::Utf8Path;

use crate::cli::VersionArgs;
use crate::version::VersionInfo;

pub fn run(args: VersionArgs, config: Option<&Utf8Path>) -> Result<()> {
    let alphacam_version = match SdkConfig::load(config) {
        Ok(config) => Some(config.alphacam_version().to_string()),
        Err(e) => {
            tracing::debug!("No SDK configuration for version output: {}", e);
            None
        }
    };
    let info = VersionInfo::current(alphacam_version);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", info.display());

        if let Some(version) = &info.alphacam_version {
            println!("ALPHACAM:   {}", version);
        }
        if let Some(commit) = &info.commit {
            println!("Commit:     {}", commit);
        }
        if let Some(target) = &info.target {
            println!("Target:     {}", target);
        }
    }

    Ok(())
}
