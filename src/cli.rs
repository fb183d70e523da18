//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use harvester_core::HarvestConfig;

/// Harvest bibliographic records and download the documents behind them.
///
/// Harvester searches an academic index for a keyword, saves the ranked
/// results as a CSV table, and can later walk that table to download the
/// documents it references.
#[derive(Parser, Debug)]
#[command(name = "harvester")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for a keyword and save the results as a CSV table
    Catch {
        /// Keyword to search for
        #[arg(short, long, default_value = "machine learning")]
        kw: String,

        /// Comma-separated source filters (venue abbreviations)
        #[arg(short, long, default_value = "ACL")]
        source: String,

        /// Column to sort the table by, descending
        #[arg(long, default_value = "Citations")]
        sortby: String,

        /// Number of results to harvest (fetched in pages of 10)
        #[arg(short, long, default_value_t = 50)]
        nresults: usize,

        /// Minimum publication year; 0 disables the year filter
        #[arg(short, long, default_value_t = 2000)]
        year: u16,

        /// Directory the table CSV is written into
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },

    /// Download the documents referenced by a previously saved table
    Download {
        /// Path to the table CSV produced by `catch`
        table: PathBuf,
    },
}

impl Command {
    /// Builds the harvest configuration for a `catch` invocation.
    #[must_use]
    pub fn harvest_config(&self) -> Option<HarvestConfig> {
        match self {
            Self::Catch {
                kw,
                source,
                sortby,
                nresults,
                year,
                path,
            } => Some(HarvestConfig {
                keyword: kw.clone(),
                sources: HarvestConfig::parse_sources(source),
                result_count: *nresults,
                sort_by: sortby.clone(),
                min_year: (*year != 0).then_some(*year),
                output_dir: path.clone(),
            }),
            Self::Download { .. } => None,
        }
    }
}
