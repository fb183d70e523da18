//! CLI entry point for the harvester tool.

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use harvester_core::{DownloadEngine, Table, run_harvest};
use tracing::{debug, info, warn};

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    match &args.command {
        Command::Catch { .. } => {
            let config = args
                .command
                .harvest_config()
                .context("catch subcommand must carry a harvest configuration")?;
            let current_year = u16::try_from(Local::now().year())
                .context("system clock year out of range")?;

            info!(keyword = %config.keyword, "harvest starting");
            let table = run_harvest(&config, current_year).await?;
            info!(
                rows = table.len(),
                path = %table.path().display(),
                "table saved"
            );
        }
        Command::Download { table } => {
            let mut table = Table::load(table)?;
            info!(rows = table.len(), "download starting");

            let engine = DownloadEngine::new();
            let report = engine.process_table(&mut table).await?;

            info!(
                downloaded = report.downloaded,
                skipped = report.skipped,
                failed = report.failed,
                unsupported = report.unsupported,
                total = report.total(),
                "download complete"
            );
            for title in &report.failed_titles {
                warn!(title = %title, "download failed, retry later or fetch by hand");
            }
            for title in &report.unsupported_titles {
                warn!(title = %title, "source not supported, fetch by hand");
            }
        }
    }

    Ok(())
}
