//! The persisted table of harvested records.
//!
//! A [`Table`] is the sole channel of state between the harvest and download
//! phases: the harvest phase creates and persists it, the download phase
//! loads it, mutates the `download` column row by row, and overwrites it in
//! place. Identity is the storage path; no other persisted state exists.
//!
//! # Format
//!
//! Flat CSV, UTF-8, header row required:
//!
//! ```text
//! Rank,Author,Title,Citations,Year,Publisher,Venue,describe,Source[,download]
//! ```
//!
//! The `download` column is optional on read (absent means all false) and
//! always present on write. Any other header - reordered, renamed, or with
//! extra columns - is rejected with [`TableError::FormatMismatch`].

mod error;

pub use error::TableError;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The required column set, in exact order, without the optional
/// `download` status column.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Rank",
    "Author",
    "Title",
    "Citations",
    "Year",
    "Publisher",
    "Venue",
    "describe",
    "Source",
];

/// Name of the optional download-status column.
pub const DOWNLOAD_COLUMN: &str = "download";

/// One harvested bibliographic reference.
///
/// Numeric fields default to 0 rather than being absent so the persisted
/// columns stay numeric-typed. Field names map to the persisted header via
/// serde renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 1-based position in discovery order, unique within one harvest.
    #[serde(rename = "Rank")]
    pub rank: u32,
    /// Display string, may combine multiple authors.
    #[serde(rename = "Author")]
    pub author: String,
    /// Result title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Citation count; 0 when absent from the fragment.
    #[serde(rename = "Citations")]
    pub citation_count: u32,
    /// Publication year; 0 when unparseable.
    #[serde(rename = "Year")]
    pub year: u16,
    /// Publisher free text.
    #[serde(rename = "Publisher")]
    pub publisher: String,
    /// Venue free text.
    #[serde(rename = "Venue")]
    pub venue: String,
    /// Snippet text below the result.
    #[serde(rename = "describe")]
    pub description: String,
    /// URL or citation string identifying where to obtain the document.
    #[serde(rename = "Source")]
    pub source_reference: String,
    /// Download status; absent in the file until a download pass has run.
    #[serde(rename = "download", default)]
    pub downloaded: bool,
}

/// An ordered collection of [`Record`]s persisted as the unit of work
/// between the harvest and download phases.
#[derive(Debug, Clone)]
pub struct Table {
    path: PathBuf,
    records: Vec<Record>,
}

impl Table {
    /// Creates an in-memory table that will persist to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, records: Vec<Record>) -> Self {
        Self {
            path: path.into(),
            records,
        }
    }

    /// Loads a table from disk, validating the header exactly.
    ///
    /// A file without the `download` column loads with every row marked
    /// not-downloaded; the column is added on the next persist.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InputNotFound`] if the path does not exist,
    /// [`TableError::FormatMismatch`] if the header is not exactly one of
    /// the two accepted column sets, and [`TableError::Read`] for CSV or IO
    /// failures.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, TableError> {
        let path = path.into();
        if !path.exists() {
            return Err(TableError::input_not_found(path));
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|e| TableError::read(&path, e))?;

        let headers = reader
            .headers()
            .map_err(|e| TableError::read(&path, e))?
            .clone();
        validate_header(&path, &headers)?;

        let mut records = Vec::new();
        for row in reader.deserialize::<Record>() {
            records.push(row.map_err(|e| TableError::read(&path, e))?);
        }

        debug!(path = %path.display(), rows = records.len(), "table loaded");
        Ok(Self { path, records })
    }

    /// Persists the table, overwriting the storage path.
    ///
    /// The `download` column is always written, so a table loaded from the
    /// nine-column form gains the column here.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Persist`] if the file cannot be written; this
    /// is fatal for the calling pass since losing the table loses all
    /// progress.
    pub fn persist(&self) -> Result<(), TableError> {
        let mut writer =
            csv::Writer::from_path(&self.path).map_err(|e| TableError::persist(&self.path, e))?;
        for record in &self.records {
            writer
                .serialize(record)
                .map_err(|e| TableError::persist(&self.path, e))?;
        }
        writer
            .flush()
            .map_err(|e| TableError::persist(&self.path, csv::Error::from(e)))?;
        debug!(path = %self.path.display(), rows = self.records.len(), "table persisted");
        Ok(())
    }

    /// The storage path (table identity).
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory artifacts for this table are downloaded into: same base
    /// name as the table file, sibling to it.
    #[must_use]
    pub fn artifact_dir(&self) -> PathBuf {
        self.path.with_extension("")
    }

    /// Records in persisted order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Mutable access for the download pass.
    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Checks that `headers` is exactly the nine required columns, optionally
/// followed by the `download` column. No reordering or extra columns.
fn validate_header(path: &Path, headers: &csv::StringRecord) -> Result<(), TableError> {
    let found: Vec<&str> = headers.iter().collect();
    let matches_required = |cols: &[&str]| cols.iter().eq(REQUIRED_COLUMNS.iter());

    let valid = match found.len() {
        9 => matches_required(&found),
        10 => matches_required(&found[..9]) && found[9] == DOWNLOAD_COLUMN,
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(TableError::FormatMismatch {
            path: path.to_path_buf(),
            expected: REQUIRED_COLUMNS.iter().map(ToString::to_string).collect(),
            found: found.iter().map(ToString::to_string).collect(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_record(rank: u32) -> Record {
        Record {
            rank,
            author: "AB Smith".to_string(),
            title: format!("Paper {rank}"),
            citation_count: rank * 10,
            year: 2020,
            publisher: "publisher.com".to_string(),
            venue: "Conference on Things".to_string(),
            description: "A snippet".to_string(),
            source_reference: format!("https://example.com/{rank}.pdf"),
            downloaded: false,
        }
    }

    #[test]
    fn test_persist_then_load_round_trips_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        let table = Table::new(&path, vec![sample_record(1), sample_record(2)]);
        table.persist().unwrap();

        let loaded = Table::load(&path).unwrap();
        assert_eq!(loaded.records(), table.records());
    }

    #[test]
    fn test_persist_writes_download_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        Table::new(&path, vec![sample_record(1)]).persist().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(
            header,
            "Rank,Author,Title,Citations,Year,Publisher,Venue,describe,Source,download"
        );
    }

    #[test]
    fn test_load_without_download_column_defaults_false() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(
            &path,
            "Rank,Author,Title,Citations,Year,Publisher,Venue,describe,Source\n\
             1,AB Smith,Paper 1,10,2020,pub,venue,snippet,https://example.com/1.pdf\n",
        )
        .unwrap();

        let table = Table::load(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.records()[0].downloaded);
    }

    #[test]
    fn test_load_missing_file_is_input_not_found() {
        let dir = TempDir::new().unwrap();
        let result = Table::load(dir.path().join("absent.csv"));
        assert!(matches!(result, Err(TableError::InputNotFound { .. })));
    }

    #[test]
    fn test_load_rejects_reordered_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(
            &path,
            "Author,Rank,Title,Citations,Year,Publisher,Venue,describe,Source\n",
        )
        .unwrap();

        let result = Table::load(&path);
        assert!(matches!(result, Err(TableError::FormatMismatch { .. })));
    }

    #[test]
    fn test_load_rejects_extra_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(
            &path,
            "Rank,Author,Title,Citations,Year,Publisher,Venue,describe,Source,download,extra\n",
        )
        .unwrap();

        let result = Table::load(&path);
        assert!(matches!(result, Err(TableError::FormatMismatch { .. })));
    }

    #[test]
    fn test_load_rejects_misnamed_download_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(
            &path,
            "Rank,Author,Title,Citations,Year,Publisher,Venue,describe,Source,Downloaded\n",
        )
        .unwrap();

        let result = Table::load(&path);
        assert!(matches!(result, Err(TableError::FormatMismatch { .. })));
    }

    #[test]
    fn test_artifact_dir_strips_extension() {
        let table = Table::new("/data/ACL_machine_learning.csv", Vec::new());
        assert_eq!(
            table.artifact_dir(),
            PathBuf::from("/data/ACL_machine_learning")
        );
    }

    #[test]
    fn test_header_round_trip_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        Table::new(&path, vec![sample_record(1)]).persist().unwrap();
        let first = std::fs::read_to_string(&path).unwrap();

        Table::load(&path).unwrap().persist().unwrap();
        let second = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);
    }
}
