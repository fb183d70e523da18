//! Harvest phase: paginated search, record extraction, ranking, persistence.
//!
//! The phase walks result pages in offset steps of 10, extracts one record
//! per fragment, assigns ranks in discovery order (1-based, +1 per record,
//! continuing across page boundaries), sorts the accumulated table, and
//! persists it as CSV. Strictly sequential: one request in flight at a time
//! with a fixed inter-page delay.

pub mod error;
pub mod extract;
pub mod fetcher;
pub mod query;
pub mod rank;

pub use error::HarvestError;
pub use extract::{ExtractError, FragmentRecord, extract_records};
pub use fetcher::{PAGE_DELAY, PageFetcher};
pub use query::{SearchQuery, build_query};
pub use rank::sort_records;

use indicatif::ProgressBar;
use tracing::{info, instrument};
use url::Url;

use crate::config::HarvestConfig;
use crate::table::{Record, Table, TableError};

/// Longest table filename written, bytes (historical cap).
const MAX_TABLE_FILENAME: usize = 255;

/// Runs one complete harvest: fetch, extract, rank, persist.
///
/// `current_year` is passed in by the caller (never computed here) so the
/// query synthesis stays pure.
///
/// # Errors
///
/// Returns [`HarvestError::Blocked`] if the search origin serves a
/// challenge page, other fetch errors for transport/status failures, and a
/// wrapped [`TableError`] if the harvested table cannot be persisted.
#[instrument(skip(config), fields(keyword = %config.keyword))]
pub async fn run_harvest(
    config: &HarvestConfig,
    current_year: u16,
) -> Result<Table, HarvestError> {
    let query = build_query(
        &config.keyword,
        &config.sources,
        config.min_year,
        current_year,
    );
    let page_urls: Vec<Url> = (0..config.result_count)
        .step_by(10)
        .map(|offset| query.page_url(offset))
        .collect();

    let fetcher = PageFetcher::new();
    let progress = ProgressBar::new(config.result_count as u64);
    let mut records = harvest_pages(&fetcher, &page_urls, &progress).await?;
    progress.finish_and_clear();

    sort_records(&mut records, &config.sort_by);

    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| TableError::persist(&config.output_dir, csv::Error::from(e)))?;
    let path = config
        .output_dir
        .join(table_filename(&config.sources, &config.keyword));
    let table = Table::new(path, records);
    table.persist()?;

    info!(
        rows = table.len(),
        path = %table.path().display(),
        "harvest complete"
    );
    Ok(table)
}

/// Fetches the given result pages in order and extracts ranked records.
///
/// Ranks are unique, 1-based, and increase by exactly one per record across
/// page boundaries. A fixed delay is enforced after every page fetch.
///
/// # Errors
///
/// Propagates the first fetch error; pages already harvested are discarded
/// with it (no partial checkpointing inside a pass).
pub async fn harvest_pages(
    fetcher: &PageFetcher,
    page_urls: &[Url],
    progress: &ProgressBar,
) -> Result<Vec<Record>, HarvestError> {
    let mut records = Vec::new();
    let mut rank: u32 = 0;

    for url in page_urls {
        let body = fetcher.fetch_page(url).await?;
        for fields in extract_records(&body, url.as_str()) {
            rank += 1;
            records.push(Record {
                rank,
                author: fields.author,
                title: fields.title,
                citation_count: fields.citation_count,
                year: fields.year,
                publisher: fields.publisher,
                venue: fields.venue,
                description: fields.description,
                source_reference: fields.link,
                downloaded: false,
            });
        }
        progress.inc(10);
        tokio::time::sleep(PAGE_DELAY).await;
    }

    Ok(records)
}

/// Builds the table filename for one keyword + source combination:
/// `<sources>_<keyword>.csv` with spaces folded to `_` and `:` to `-`,
/// capped at the historical filename limit.
#[must_use]
pub fn table_filename(sources: &[String], keyword: &str) -> String {
    let stem = format!("{}_{keyword}", sources.join(","))
        .replace(' ', "_")
        .replace(':', "-");
    let mut name = format!("{stem}.csv");
    if name.len() > MAX_TABLE_FILENAME {
        let mut cut = MAX_TABLE_FILENAME;
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        name.truncate(cut);
    }
    name
}
