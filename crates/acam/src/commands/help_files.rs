//! Help files command - staged help files and the rendered index

use std::path::PathBuf;

use acam_components::Manifest;
use acam_sdk::SdkState;
use anyhow::{bail, Result};
use camino::Utf8Path;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::HelpFilesArgs;
use crate::output;

#[derive(Tabled, Serialize)]
struct HelpFileRow {
    name: String,
    description: String,
    path: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HelpFilesJson {
    files: Vec<HelpFileRow>,
    index_path: Option<PathBuf>,
}

pub async fn run(args: HelpFilesArgs, config: Option<&Utf8Path>) -> Result<()> {
    let sdk = super::facade(config);
    super::initialize(&sdk).await?;

    if sdk.state() != SdkState::Ready {
        bail!("Help files are only staged once every required component is loaded; run `acam status` for details");
    }

    let manifest = Manifest::help_files();
    let files: Vec<HelpFileRow> = sdk
        .help_files()
        .await?
        .into_iter()
        .map(|(name, path)| HelpFileRow {
            description: manifest
                .get(&name)
                .and_then(|e| e.description.clone())
                .unwrap_or_default(),
            name,
            path: path.display().to_string(),
        })
        .collect();
    let index_path = sdk.help_index_path().await?;

    if args.json {
        let json = HelpFilesJson { files, index_path };
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if files.is_empty() {
        output::warning("No help files found in the ALPHACAM installation");
    } else {
        let mut table = Table::new(files);
        table.with(Style::sharp());
        println!("{}", table);
    }

    match index_path {
        Some(path) => output::kv("Help index", &path.display().to_string()),
        None => output::warning("Help index was not written"),
    }

    Ok(())
}
