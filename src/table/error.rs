//! Error types for table loading and persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or persisting a table.
///
/// `InputNotFound` and `FormatMismatch` abort an operation before any
/// network or filesystem mutation; `Persist` is fatal because losing the
/// table loses all progress for the pass.
#[derive(Debug, Error)]
pub enum TableError {
    /// The table file does not exist at the given path.
    #[error("input table not found: {path}")]
    InputNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The table header does not exactly match the required column set.
    #[error(
        "table header mismatch in {path}: expected {expected:?} (optionally followed by \"download\"), found {found:?}"
    )]
    FormatMismatch {
        /// The offending file.
        path: PathBuf,
        /// The required column set (without the optional download column).
        expected: Vec<String>,
        /// The header actually present in the file.
        found: Vec<String>,
    },

    /// The table file could not be read or a row failed to parse.
    #[error("failed to read table {path}: {source}")]
    Read {
        /// The file being read.
        path: PathBuf,
        /// The underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// The table could not be written back to disk.
    #[error("failed to persist table {path}: {source}")]
    Persist {
        /// The file being written.
        path: PathBuf,
        /// The underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

impl TableError {
    /// Creates an input-not-found error.
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a persist error.
    pub fn persist(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Persist {
            path: path.into(),
            source,
        }
    }
}
