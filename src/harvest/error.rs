//! Error types for the harvest phase.

use thiserror::Error;

use crate::table::TableError;

/// Errors that abort a harvest run.
///
/// Per-field extraction failures are NOT here - they are always recovered
/// via documented fallback values inside the extraction engine.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The search origin served an anti-automation challenge page instead
    /// of results. There is no browser-automation fallback, so the harvest
    /// aborts with this typed condition rather than continuing with empty
    /// content.
    #[error(
        "challenge page encountered fetching {url}: the search origin is blocking automated \
         traffic; wait and retry later"
    )]
    Blocked {
        /// The page URL that triggered the challenge.
        url: String,
    },

    /// Network-level failure fetching a result page.
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The page URL that failed.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status from the search origin.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The page URL that failed.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The harvested table could not be persisted.
    #[error(transparent)]
    Table(#[from] TableError),
}

impl HarvestError {
    /// Creates a blocked error.
    pub fn blocked(url: impl Into<String>) -> Self {
        Self::Blocked { url: url.into() }
    }

    /// Creates a network error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_display_names_the_url() {
        let error = HarvestError::blocked("https://example.com/search?q=x");
        let msg = error.to_string();
        assert!(msg.contains("challenge page"), "Expected in: {msg}");
        assert!(msg.contains("https://example.com/search?q=x"));
    }

    #[test]
    fn test_http_status_display() {
        let error = HarvestError::http_status("https://example.com/search", 429);
        let msg = error.to_string();
        assert!(msg.contains("429"), "Expected status in: {msg}");
    }
}
