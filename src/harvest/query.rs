//! Query URL builder for the paginated search interface.
//!
//! Pure: the current year is a call parameter, never read from a global
//! clock, so synthesized URLs are deterministic and testable. Free-text
//! encoding is delegated to the `url` crate's query serializer; no keyword
//! validation happens here.

use url::Url;

/// Search endpoint for the scholarly result interface.
const SCHOLAR_URL: &str = "https://scholar.google.com/scholar";

/// A synthesized search query, parameterized by a page offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    query_text: String,
    min_year: Option<u16>,
    max_year: Option<u16>,
}

/// Builds the query for one keyword + source combination.
///
/// Multiple sources are joined as `source:A OR source:B` in parentheses
/// after the keyword; commas inside the keyword are folded to `+` (the
/// upstream interface treats them as term separators). When a year filter
/// is supplied, a lower bound is always added and an upper bound is added
/// unless the filter year is the current year.
#[must_use]
pub fn build_query(
    keyword: &str,
    sources: &[String],
    min_year: Option<u16>,
    current_year: u16,
) -> SearchQuery {
    let keyword = keyword.replace(',', "+");
    let query_text = if sources.is_empty() {
        keyword
    } else {
        let joined = sources
            .iter()
            .map(|s| format!("source:{s}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        format!("{keyword} ({joined})")
    };

    SearchQuery {
        query_text,
        min_year,
        max_year: min_year.filter(|year| *year != current_year),
    }
}

impl SearchQuery {
    /// Returns the URL for the result page starting at `offset`.
    ///
    /// # Panics
    ///
    /// Never panics in practice: the endpoint constant is a valid URL.
    #[must_use]
    #[allow(clippy::missing_panics_doc, clippy::unwrap_used)]
    pub fn page_url(&self, offset: usize) -> Url {
        let mut url = Url::parse(SCHOLAR_URL).unwrap();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("start", &offset.to_string())
                .append_pair("q", &self.query_text)
                .append_pair("hl", "en")
                .append_pair("as_sdt", "0,5");
            if let Some(min_year) = self.min_year {
                pairs.append_pair("as_ylo", &min_year.to_string());
            }
            if let Some(max_year) = self.max_year {
                pairs.append_pair("as_yhi", &max_year.to_string());
            }
        }
        url
    }

    /// The free-text portion of the query (keyword plus source filters).
    #[must_use]
    pub fn query_text(&self) -> &str {
        &self.query_text
    }
}
