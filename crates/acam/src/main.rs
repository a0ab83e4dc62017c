//! ALPHACAM SDK CLI
//!
//! Stages SDK components from an ALPHACAM installation into the SDK
//! workspace and reports on what was loaded.

mod cli;
mod commands;
mod output;
mod version;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Version(args) => commands::version::run(args, config),
        Commands::Status(args) => commands::status::run(args, config).await,
        Commands::Sync(args) => commands::sync::run(args, config).await,
        Commands::Libraries(args) => commands::libraries::run(args, config).await,
        Commands::HelpFiles(args) => commands::help_files::run(args, config).await,
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Reports go to stdout; keep the log to warnings unless asked
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
