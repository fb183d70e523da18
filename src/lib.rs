//! Harvester Core Library
//!
//! This library harvests bibliographic records from a paginated scholarly
//! search interface, normalizes them into a CSV-persisted table, and in a
//! separate pass resolves each record's source reference into a direct
//! document URL that it downloads and tracks.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`harvest`] - Query synthesis, page fetching, record extraction, ranking
//! - [`table`] - The persisted table of records shared between the two phases
//! - [`resolver`] - Priority-ordered rule chain mapping references to PDF URLs
//! - [`download`] - Per-row download orchestration with persisted status
//!
//! The harvest and download phases never call each other; the persisted
//! table is their only shared channel.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod harvest;
pub mod resolver;
pub mod table;
pub mod user_agent;

// Re-export commonly used types
pub use config::HarvestConfig;
pub use download::{DownloadEngine, DownloadError, DownloadReport};
pub use harvest::{HarvestError, run_harvest};
pub use resolver::{Resolution, Resolver, ResolverChain, build_default_chain};
pub use table::{Record, Table, TableError};
