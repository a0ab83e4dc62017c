//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// acam - ALPHACAM SDK component staging and inspection
#[derive(Parser, Debug)]
#[command(name = "acam")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to sdk_config.json (default: ACAM_SDK_CONFIG, then discovery)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version(VersionArgs),

    /// Initialize the SDK and print the readiness report
    Status(StatusArgs),

    /// Stage components and help files without loading them
    Sync(SyncArgs),

    /// List required components and their loaded versions
    Libraries(LibrariesArgs),

    /// List staged help files and the rendered help index
    HelpFiles(HelpFilesArgs),
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format: human, json, yaml
    #[arg(short, long, default_value = "human")]
    pub format: String,

    /// Exit with a non-zero code when components are missing
    #[arg(long)]
    pub ci: bool,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Stage binary components only
    #[arg(long, conflicts_with = "help_only")]
    pub binaries_only: bool,

    /// Stage help files only
    #[arg(long)]
    pub help_only: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LibrariesArgs {
    /// Show missing components only
    #[arg(long)]
    pub missing: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct HelpFilesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["acam", "status", "-vv", "--config", "/tmp/sdk_config.json"]);

        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.config.as_deref(),
            Some(camino::Utf8Path::new("/tmp/sdk_config.json"))
        );
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_status_flags() {
        let cli = Cli::parse_from(["acam", "status", "--format", "json", "--ci"]);

        let Commands::Status(args) = cli.command else {
            panic!("expected status command");
        };
        assert_eq!(args.format, "json");
        assert!(args.ci);
    }

    #[test]
    fn test_sync_filters_conflict() {
        let result = Cli::try_parse_from(["acam", "sync", "--binaries-only", "--help-only"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_files_subcommand_name() {
        let cli = Cli::parse_from(["acam", "help-files", "--json"]);
        assert!(matches!(cli.command, Commands::HelpFiles(HelpFilesArgs { json: true })));
    }
}
