//! Result-page fetcher with challenge-page detection.
//!
//! One reusable client per harvest: connection and cookie reuse across
//! result pages keeps the session consistent, and the harvest loop enforces
//! a fixed inter-request delay on top of this fetcher. The delay is a
//! correctness requirement, not a performance tweak - omitting it materially
//! increases challenge-page frequency.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::error::HarvestError;
use crate::user_agent;

/// Connect timeout for result-page requests, seconds.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Read timeout for result-page requests, seconds.
const READ_TIMEOUT_SECS: u64 = 60;

/// Fixed delay enforced between result-page requests.
pub const PAGE_DELAY: Duration = Duration::from_millis(500);

/// Phrases that identify an anti-automation challenge page.
const CHALLENGE_PHRASES: [&str; 2] = ["unusual traffic from your computer network", "not a robot"];

/// Fetches result pages over a single reusable HTTP session.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher {
    /// Creates a fetcher with cookie reuse and default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let client = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .user_agent(user_agent::default_harvest_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Fetches one result page and returns its body as text.
    ///
    /// The raw body is first decoded one-byte-per-char (the challenge page
    /// is not guaranteed to be UTF-8) and scanned for challenge phrases;
    /// a hit aborts with [`HarvestError::Blocked`] before any status
    /// handling, since challenge pages are often served with non-2xx codes.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Blocked`] for a challenge page,
    /// [`HarvestError::Network`] for transport failures, and
    /// [`HarvestError::HttpStatus`] for non-success responses.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &Url) -> Result<String, HarvestError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| HarvestError::network(url.as_str(), e))?;
        let status = response.status();

        let body = response
            .bytes()
            .await
            .map_err(|e| HarvestError::network(url.as_str(), e))?;

        if is_challenge_page(&body) {
            return Err(HarvestError::blocked(url.as_str()));
        }

        if !status.is_success() {
            return Err(HarvestError::http_status(url.as_str(), status.as_u16()));
        }

        debug!(bytes = body.len(), "result page fetched");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Scans a single-byte-per-char view of the body for challenge phrases.
fn is_challenge_page(body: &[u8]) -> bool {
    let latin1_view: String = body.iter().map(|&b| char::from(b)).collect();
    CHALLENGE_PHRASES
        .iter()
        .any(|phrase| latin1_view.contains(phrase))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_challenge_phrase_detected() {
        assert!(is_challenge_page(
            b"<html>Our systems have detected unusual traffic from your computer network.</html>"
        ));
        assert!(is_challenge_page(
            b"please confirm that you're not a robot"
        ));
    }

    #[test]
    fn test_plain_results_page_not_flagged() {
        assert!(!is_challenge_page(
            b"<html><div class=\"gs_or\">a result</div></html>"
        ));
    }

    #[test]
    fn test_challenge_detected_in_non_utf8_body() {
        // 0xE9 is latin-1 'e acute'; the body is not valid UTF-8 but the
        // phrase scan must still work on the byte-per-char view.
        let mut body = b"caf\xE9 interstitial: not a robot".to_vec();
        assert!(String::from_utf8(body.clone()).is_err());
        assert!(is_challenge_page(&body));
        body.truncate(4);
        assert!(!is_challenge_page(&body));
    }

    #[tokio::test]
    async fn test_fetch_page_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scholar"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>results</html>"))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new();
        let url = Url::parse(&format!("{}/scholar", server.uri())).unwrap();
        let body = fetcher.fetch_page(&url).await.unwrap();
        assert!(body.contains("results"));
    }

    #[tokio::test]
    async fn test_fetch_page_challenge_is_typed_blocked() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scholar"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_string("detected unusual traffic from your computer network"),
            )
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new();
        let url = Url::parse(&format!("{}/scholar", server.uri())).unwrap();
        let result = fetcher.fetch_page(&url).await;
        assert!(matches!(result, Err(HarvestError::Blocked { .. })));
    }

    #[tokio::test]
    async fn test_fetch_page_http_error_without_challenge() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scholar"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new();
        let url = Url::parse(&format!("{}/scholar", server.uri())).unwrap();
        let result = fetcher.fetch_page(&url).await;
        assert!(matches!(
            result,
            Err(HarvestError::HttpStatus { status: 503, .. })
        ));
    }
}
