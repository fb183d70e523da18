//! Fatal errors for the download pass.
//!
//! Per-row fetch failures and unsupported references are NOT errors; they
//! are tallied into the [`DownloadReport`](super::DownloadReport) and the
//! pass keeps going. Only failures that make the whole pass meaningless
//! surface here.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::table::TableError;

/// A failure that aborts the download pass.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The artifact directory could not be created; nothing can be saved.
    #[error("failed to prepare artifact directory {path}: {source}")]
    ArtifactDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The table could not be loaded or the updated statuses could not be
    /// written back; losing the table loses all recorded progress.
    #[error(transparent)]
    Table(#[from] TableError),
}

impl DownloadError {
    /// Creates an [`DownloadError::ArtifactDir`] error.
    pub fn artifact_dir(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::ArtifactDir {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
