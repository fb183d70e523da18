//! Download pass: resolve each record's reference and save the document.
//!
//! The pass walks a loaded [`Table`] row by row, resolves each record's
//! source reference through the rule chain, and saves resolved documents
//! into the table's artifact directory. Downloads are idempotent on the
//! destination path: an artifact that already exists is never re-fetched.
//! Per-row failures and unsupported references are tallied, not raised; the
//! updated statuses are written back to the table exactly once at the end.

mod error;

pub use error::DownloadError;

use std::path::{Path, PathBuf};
use std::time::Duration;

use indicatif::ProgressBar;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};

use crate::resolver::{Resolution, ResolverChain, build_default_chain};
use crate::table::Table;
use crate::user_agent::BROWSER_USER_AGENT;

/// Connect timeout for document fetches, seconds.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Overall timeout for one document fetch, seconds. Documents can be
/// large, so this is much longer than the page-fetch timeout.
const DOWNLOAD_TIMEOUT_SECS: u64 = 300;

/// Outcome tallies for one download pass. Titles are kept for the two
/// outcomes the operator has to follow up on by hand.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// Documents fetched and saved in this pass.
    pub downloaded: usize,
    /// Rows whose artifact already existed on disk.
    pub skipped: usize,
    /// Rows whose document fetch failed.
    pub failed: usize,
    /// Rows no resolution rule produced a document URL for.
    pub unsupported: usize,
    /// Titles of the failed rows, in table order.
    pub failed_titles: Vec<String>,
    /// Titles of the unsupported rows, in table order.
    pub unsupported_titles: Vec<String>,
}

impl DownloadReport {
    /// Total rows examined.
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed + self.unsupported
    }
}

/// Resolves and downloads the documents behind a table's records.
#[derive(Debug)]
pub struct DownloadEngine {
    client: Client,
    chain: ResolverChain,
}

impl Default for DownloadEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadEngine {
    /// Creates an engine with the default resolution rule chain.
    #[must_use]
    pub fn new() -> Self {
        Self::with_chain(build_default_chain())
    }

    /// Creates an engine with a custom rule chain (for tests).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_chain(chain: ResolverChain) -> Self {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client, chain }
    }

    /// Runs the download pass over every record in the table.
    ///
    /// Mutates each record's download status in memory as it goes and
    /// persists the table once after the loop.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::ArtifactDir`] if the artifact directory
    /// cannot be created and a wrapped table error if the updated statuses
    /// cannot be written back. Per-row fetch failures are reported through
    /// the returned [`DownloadReport`], not as errors.
    #[instrument(skip(self, table), fields(path = %table.path().display()))]
    pub async fn process_table(&self, table: &mut Table) -> Result<DownloadReport, DownloadError> {
        let artifact_dir = table.artifact_dir();
        let mut report = DownloadReport::default();
        let progress = ProgressBar::new(table.len() as u64);

        for record in table.records_mut() {
            // The destination depends only on the title, so the idempotent
            // skip happens before resolution: a present artifact must cost
            // zero network requests on a re-run, including the OJS rule's
            // secondary fetch.
            let destination = artifact_path(&artifact_dir, &record.title);
            if destination.exists() {
                debug!(path = %destination.display(), "artifact already present");
                record.downloaded = true;
                report.skipped += 1;
            } else {
                match self.chain.resolve(&record.source_reference).await {
                    Resolution::Unsupported => {
                        debug!(title = %record.title, "no rule resolves reference");
                        record.downloaded = false;
                        report.unsupported += 1;
                        report.unsupported_titles.push(record.title.clone());
                    }
                    Resolution::DirectUrl(url) => {
                        if self.fetch_artifact(&url, &artifact_dir, &destination).await? {
                            record.downloaded = true;
                            report.downloaded += 1;
                        } else {
                            // A stale true from an earlier pass must not
                            // survive a failed re-fetch.
                            record.downloaded = false;
                            report.failed += 1;
                            report.failed_titles.push(record.title.clone());
                        }
                    }
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        table.persist()?;

        info!(
            downloaded = report.downloaded,
            skipped = report.skipped,
            failed = report.failed,
            unsupported = report.unsupported,
            "download pass complete"
        );
        Ok(report)
    }

    /// Fetches one document and writes it to `destination`. Returns false
    /// on any per-row failure (transport, status, or file write).
    async fn fetch_artifact(
        &self,
        url: &str,
        artifact_dir: &Path,
        destination: &Path,
    ) -> Result<bool, DownloadError> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "document fetch failed");
                return Ok(false);
            }
        };
        // Exactly 200: redirects to login pages and partial responses both
        // produce content that is not the document.
        if response.status() != StatusCode::OK {
            warn!(url, status = %response.status(), "document fetch rejected");
            return Ok(false);
        }
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                warn!(url, error = %e, "document body read failed");
                return Ok(false);
            }
        };

        // The directory is only created once something is actually saved,
        // so an all-unsupported table leaves no empty directory behind.
        std::fs::create_dir_all(artifact_dir)
            .map_err(|e| DownloadError::artifact_dir(artifact_dir, e))?;
        if let Err(e) = std::fs::write(destination, &body) {
            warn!(path = %destination.display(), error = %e, "artifact write failed");
            return Ok(false);
        }
        debug!(url, path = %destination.display(), "artifact saved");
        Ok(true)
    }
}

/// Destination path for one record's artifact inside the artifact
/// directory, derived from its title.
fn artifact_path(artifact_dir: &Path, title: &str) -> PathBuf {
    artifact_dir.join(format!("{}.pdf", sanitize_title(title)))
}

/// Folds characters that are unsafe in filenames to `_`. Spaces are kept;
/// titles stay readable on disk.
fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title_folds_separator_characters() {
        assert_eq!(
            sanitize_title("BERT: Pre-training / Fine-tuning?"),
            "BERT_ Pre-training _ Fine-tuning_"
        );
    }

    #[test]
    fn test_sanitize_title_keeps_spaces_and_unicode() {
        assert_eq!(sanitize_title("Attention Is All You Need"), "Attention Is All You Need");
        assert_eq!(sanitize_title("Éléments d'analyse"), "Éléments d'analyse");
    }

    #[test]
    fn test_sanitize_title_folds_control_characters() {
        assert_eq!(sanitize_title("bad\ntitle\t"), "bad_title_");
    }

    #[test]
    fn test_artifact_path_appends_document_suffix() {
        let path = artifact_path(Path::new("/data/ACL_nlp"), "A: Paper");
        assert_eq!(path, PathBuf::from("/data/ACL_nlp/A_ Paper.pdf"));
    }

    #[test]
    fn test_report_total_sums_all_outcomes() {
        let report = DownloadReport {
            downloaded: 2,
            skipped: 1,
            failed: 3,
            unsupported: 4,
            ..DownloadReport::default()
        };
        assert_eq!(report.total(), 10);
    }
}
