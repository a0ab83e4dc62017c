//! Sync command - stage artifacts into the workspace without loading them

use acam_components::{ArtifactSyncer, Manifest, SyncOutcome, SyncReport, WorkspacePaths};
use acam_core::SdkConfig;
use anyhow::{Context, Result};
use camino::Utf8Path;
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::SyncArgs;
use crate::output;

#[derive(Tabled, Serialize)]
struct SyncRow {
    name: String,
    outcome: String,
    detail: String,
    #[tabled(skip)]
    kind: String,
    #[tabled(skip)]
    staged: bool,
}

pub async fn run(args: SyncArgs, config: Option<&Utf8Path>) -> Result<()> {
    let config = SdkConfig::load(config).context("Failed to load SDK configuration")?;
    let paths = WorkspacePaths::new(
        config.installation_root().as_std_path(),
        config.workspace_root().as_std_path(),
    );
    let syncer = ArtifactSyncer::from_settings(config.sync());

    let mut manifests = Vec::new();
    if !args.help_only {
        manifests.push(Manifest::required_components());
    }
    if !args.binaries_only {
        manifests.push(Manifest::help_files());
    }

    let spinner = output::spinner("Staging artifacts...");
    let mut reports = Vec::with_capacity(manifests.len());
    for manifest in &manifests {
        spinner.set_message(format!("Staging {} artifacts...", manifest.kind()));
        reports.push(syncer.sync(&paths, manifest).await);
    }
    spinner.finish_and_clear();

    if args.json {
        let rows: Vec<SyncRow> = reports.iter().flat_map(rows).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    output::kv("Installation", &paths.source_root().display().to_string());
    output::kv("Workspace", &paths.workspace_root().display().to_string());

    for report in &reports {
        output::header(&format!(
            "{} artifacts -> {}",
            report.kind,
            paths.staging_dir(report.kind).display()
        ));
        let mut table = Table::new(rows(report));
        table.with(Style::sharp());
        println!("{}", table);
        print_summary(report);
    }

    Ok(())
}

fn rows(report: &SyncReport) -> Vec<SyncRow> {
    report
        .results
        .iter()
        .map(|result| SyncRow {
            name: result.name.clone(),
            outcome: result.outcome.label().to_string(),
            detail: match &result.outcome {
                SyncOutcome::Copied { bytes } => format!("{} bytes", bytes),
                other => other.error().map(|e| e.to_string()).unwrap_or_default(),
            },
            kind: report.kind.to_string(),
            staged: result.staged,
        })
        .collect()
}

fn print_summary(report: &SyncReport) {
    let staged = report.staged().len();
    let total = report.results.len();
    let missing = report.missing_sources().len();
    let failed = report.failures().len();

    let summary = format!(
        "{} of {} staged ({} copied) in {:.2}s",
        staged,
        total,
        report.copied_count(),
        report.duration.as_secs_f64()
    );
    if missing == 0 && failed == 0 {
        output::success(&summary);
    } else {
        output::warning(&format!(
            "{}; {} missing, {} failed",
            summary,
            missing.to_string().yellow(),
            failed.to_string().red()
        ));
    }
}
