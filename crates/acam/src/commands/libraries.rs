//! Libraries command - required components and their loaded versions

use acam_components::{ComponentRow, ComponentStatus};
use anyhow::{bail, Result};
use camino::Utf8Path;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::LibrariesArgs;
use crate::output;

#[derive(Tabled, Serialize)]
struct LibraryRow {
    name: String,
    group: String,
    status: String,
    version: String,
    path: String,
}

impl From<&ComponentRow> for LibraryRow {
    fn from(row: &ComponentRow) -> Self {
        Self {
            name: row.name.clone(),
            group: row.group.display_name().to_string(),
            status: match row.status {
                ComponentStatus::Loaded => "loaded",
                ComponentStatus::Missing => "missing",
            }
            .to_string(),
            version: row.version.clone().unwrap_or_else(|| "-".to_string()),
            path: row
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }
}

pub async fn run(args: LibrariesArgs, config: Option<&Utf8Path>) -> Result<()> {
    let sdk = super::facade(config);
    super::initialize(&sdk).await?;

    let Some(report) = sdk.last_readiness_report().await else {
        bail!("No components were loaded");
    };

    let rows: Vec<LibraryRow> = report
        .components
        .iter()
        .filter(|row| !args.missing || row.status == ComponentStatus::Missing)
        .map(LibraryRow::from)
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        output::success("No missing components");
        return Ok(());
    }

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);

    let loaded = report.components.len() - report.missing.len();
    output::info(&format!(
        "{} of {} required components loaded",
        loaded,
        report.components.len()
    ));

    Ok(())
}
