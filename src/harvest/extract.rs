//! Record extraction engine: result fragments to typed fields.
//!
//! The upstream markup contract is unreliable and unversioned, so every
//! field is produced by an isolated, named, best-effort heuristic returning
//! `Result<_, ExtractError>`. Failure of one extractor never blocks the
//! others: exactly one [`FragmentRecord`] is produced per fragment, with the
//! documented fallback substituted for any failed field. The hyphen/comma
//! position heuristics are fragile by construction; they are kept as-is so
//! each can be replaced independently as the upstream layout drifts, not
//! hardened silently.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, trace};

/// Compiles a static regex pattern, panicking on invalid patterns (programmer error).
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Compiles a static CSS selector, panicking on invalid selectors (programmer error).
fn compile_static_selector(selector: &str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| panic!("invalid static selector '{selector}': {e}"))
}

/// One result fragment container per bibliographic entry.
static FRAGMENT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.gs_or"));

/// The result's primary hyperlink inside its heading.
static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("h3 a"));

/// The author/venue/date byline below the heading.
static BYLINE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("div.gs_a"));

/// The snippet text block below the result.
static SNIPPET_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector("div.gs_rs"));

/// Citation count anywhere in the fragment's serialized form.
static CITED_BY_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"Cited by (\d+)"));

const TITLE_FALLBACK: &str = "Could not catch title";
const AUTHOR_FALLBACK: &str = "Author not found";
const PUBLISHER_FALLBACK: &str = "Publisher not found";
const VENUE_FALLBACK: &str = "Venue not found";
const DESCRIPTION_FALLBACK: &str = "Describe not found";

/// A per-field extraction failure.
///
/// Never surfaced beyond debug logs: the engine always recovers by
/// substituting the field's documented fallback value.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The expected node is absent from the fragment.
    #[error("missing {0} node in fragment")]
    MissingNode(&'static str),

    /// The expected substring/layout is absent from the text.
    #[error("no {0} found in fragment text")]
    NotFound(&'static str),

    /// The located candidate text could not be parsed into the field type.
    #[error("could not parse {what} from {text:?}")]
    Unparseable {
        /// The field being extracted.
        what: &'static str,
        /// The offending candidate text.
        text: String,
    },
}

/// Typed fields extracted from one fragment, fallbacks already applied.
///
/// Rank is assigned by the harvest loop, not here, so extraction stays a
/// pure function of the page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentRecord {
    /// Primary hyperlink, or a "look manually" marker.
    pub link: String,
    /// Link display text.
    pub title: String,
    /// Parsed "Cited by N" count, 0 if absent.
    pub citation_count: u32,
    /// Year from the byline heuristic, 0 if unparseable.
    pub year: u16,
    /// Byline text up to the first hyphen, edges trimmed.
    pub author: String,
    /// Byline text after the last hyphen.
    pub publisher: String,
    /// Second-to-last hyphen segment of the byline, last comma segment dropped.
    pub venue: String,
    /// Snippet text, same edge trim as the author field.
    pub description: String,
}

/// Extracts one [`FragmentRecord`] per result fragment, in page encounter
/// order. `page_url` is only used for the manual-lookup link fallback.
#[must_use]
pub fn extract_records(page_html: &str, page_url: &str) -> Vec<FragmentRecord> {
    let document = Html::parse_document(page_html);
    let records: Vec<FragmentRecord> = document
        .select(&FRAGMENT_SELECTOR)
        .map(|fragment| extract_fragment(fragment, page_url))
        .collect();
    trace!(fragments = records.len(), "page extracted");
    records
}

/// Runs all eight field extractors over one fragment, independently.
fn extract_fragment(fragment: ElementRef<'_>, page_url: &str) -> FragmentRecord {
    let anchor = fragment.select(&LINK_SELECTOR).next();
    let byline = fragment.select(&BYLINE_SELECTOR).next().map(element_text);
    let snippet = fragment.select(&SNIPPET_SELECTOR).next().map(element_text);

    let link = anchor
        .and_then(|a| a.value().attr("href"))
        .map_or_else(|| format!("Look manually at: {page_url}"), ToString::to_string);
    let title = anchor.map_or_else(|| TITLE_FALLBACK.to_string(), element_text);

    let citation_count = with_fallback("citation_count", 0, citations_from_html(&fragment.html()));

    let on_byline = |what: &'static str, f: fn(&str) -> Result<String, ExtractError>| {
        byline
            .as_deref()
            .ok_or(ExtractError::MissingNode("byline"))
            .and_then(f)
            .map_err(|e| {
                debug!(field = what, error = %e, "field extraction failed, using fallback");
            })
    };

    let year = with_fallback(
        "year",
        0,
        byline
            .as_deref()
            .ok_or(ExtractError::MissingNode("byline"))
            .and_then(year_from_byline),
    );
    let author = on_byline("author", trim_edges).unwrap_or_else(|()| AUTHOR_FALLBACK.to_string());
    let publisher = on_byline("publisher", publisher_from_byline)
        .unwrap_or_else(|()| PUBLISHER_FALLBACK.to_string());
    let venue =
        on_byline("venue", venue_from_byline).unwrap_or_else(|()| VENUE_FALLBACK.to_string());

    let description = snippet
        .as_deref()
        .ok_or(ExtractError::MissingNode("snippet"))
        .and_then(trim_edges)
        .map_err(|e| debug!(field = "description", error = %e, "field extraction failed, using fallback"))
        .unwrap_or_else(|()| DESCRIPTION_FALLBACK.to_string());

    FragmentRecord {
        link,
        title,
        citation_count,
        year,
        author,
        publisher,
        venue,
        description,
    }
}

/// Logs a failed numeric extraction and substitutes the fallback.
fn with_fallback<T>(field: &'static str, fallback: T, result: Result<T, ExtractError>) -> T {
    result.unwrap_or_else(|e| {
        debug!(field, error = %e, "field extraction failed, using fallback");
        fallback
    })
}

/// Concatenated text content of an element subtree.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Parses `Cited by N` anywhere in the fragment's serialized form.
pub(crate) fn citations_from_html(html: &str) -> Result<u32, ExtractError> {
    let captures = CITED_BY_RE
        .captures(html)
        .ok_or(ExtractError::NotFound("Cited by"))?;
    let digits = &captures[1];
    digits.parse().map_err(|_| ExtractError::Unparseable {
        what: "citation_count",
        text: digits.to_string(),
    })
}

/// Year heuristic: the four characters preceding the character before the
/// LAST hyphen of the byline. Depends on the exact dash-delimited layout
/// ("authors - venue, year - publisher"); best-effort by design.
pub(crate) fn year_from_byline(byline: &str) -> Result<u16, ExtractError> {
    let chars: Vec<char> = byline.chars().collect();
    let mut candidate: Option<String> = None;
    for (i, &c) in chars.iter().enumerate() {
        if c == '-' && i >= 5 {
            candidate = Some(chars[i - 5..i - 1].iter().collect());
        }
    }
    let candidate = candidate.ok_or(ExtractError::NotFound("year"))?;
    if candidate.chars().all(|c| c.is_ascii_digit()) && !candidate.is_empty() {
        candidate.parse().map_err(|_| ExtractError::Unparseable {
            what: "year",
            text: candidate.clone(),
        })
    } else {
        Err(ExtractError::Unparseable {
            what: "year",
            text: candidate,
        })
    }
}

/// Shared author/description trim: text up to the first hyphen, dropping the
/// first two characters and the character immediately before the hyphen.
/// With no hyphen present, two characters are dropped at both ends (the
/// historical slice semantics of this heuristic).
pub(crate) fn trim_edges(text: &str) -> Result<String, ExtractError> {
    let chars: Vec<char> = text.chars().collect();
    let cut = chars
        .iter()
        .position(|&c| c == '-')
        .unwrap_or_else(|| chars.len().saturating_sub(1));
    if chars.len() < 3 || cut < 3 {
        return Err(ExtractError::Unparseable {
            what: "edge-trimmed text",
            text: text.to_string(),
        });
    }
    Ok(chars[2..cut - 1].iter().collect())
}

/// Publisher heuristic: everything after the last hyphen of the byline.
pub(crate) fn publisher_from_byline(byline: &str) -> Result<String, ExtractError> {
    byline
        .rsplit('-')
        .next()
        .map(ToString::to_string)
        .ok_or(ExtractError::NotFound("publisher"))
}

/// Venue heuristic: the second-to-last hyphen segment of the byline, with
/// its last comma segment (the year) dropped and the rest joined by spaces.
pub(crate) fn venue_from_byline(byline: &str) -> Result<String, ExtractError> {
    let segments: Vec<&str> = byline.split('-').collect();
    if segments.len() < 2 {
        return Err(ExtractError::NotFound("venue"));
    }
    let comma_parts: Vec<&str> = segments[segments.len() - 2].split(',').collect();
    Ok(comma_parts[..comma_parts.len() - 1].join(" "))
}
