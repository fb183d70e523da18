//! Open-journal-system resolver: landing-page secondary fetch.
//!
//! The only effectful rule in the chain. OJS installs serve the article
//! landing page with a gallery link to the PDF view; the landing page must
//! be fetched with a realistic browser identity because these origins
//! reject default library clients. Every failure mode here - transport
//! error, non-success status, missing gallery anchor - degrades to
//! [`Resolution::Unsupported`], never a hard error.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use scraper::{Html, Selector};
use tracing::debug;

use super::{Resolution, Resolver};
use crate::user_agent::BROWSER_USER_AGENT;

/// Reference prefix identifying an open-journal-system host.
const OJS_HOST_PREFIX: &str = "https://ojs.";

/// Connect timeout for landing-page fetches, seconds.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Read timeout for landing-page fetches, seconds.
const READ_TIMEOUT_SECS: u64 = 60;

/// The gallery anchor OJS tags the PDF view with.
static GALLEY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a.obj_galley_link.pdf")
        .unwrap_or_else(|e| panic!("invalid static selector: {e}"))
});

/// Rule 4: OJS references resolve by fetching the landing page and
/// returning the href of the PDF gallery anchor.
#[derive(Debug, Clone)]
pub struct OjsResolver {
    client: Client,
    host_prefix: String,
}

impl Default for OjsResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl OjsResolver {
    /// Creates the resolver with the default OJS host prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::with_host_prefix(OJS_HOST_PREFIX)
    }

    /// Creates the resolver with a custom host prefix (for tests).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_host_prefix(host_prefix: impl Into<String>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .gzip(true)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self {
            client,
            host_prefix: host_prefix.into(),
        }
    }

    /// Fetches the landing page and extracts the gallery href.
    async fn fetch_galley_href(&self, reference: &str) -> Option<String> {
        let response = self
            .client
            .get(reference)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            debug!(status = %response.status(), reference, "landing page fetch failed");
            return None;
        }
        let body = response.text().await.ok()?;
        let document = Html::parse_document(&body);
        document
            .select(&GALLEY_SELECTOR)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
            .map(ToString::to_string)
    }
}

#[async_trait]
impl Resolver for OjsResolver {
    fn name(&self) -> &'static str {
        "ojs"
    }

    fn matches(&self, reference: &str) -> bool {
        reference.starts_with(&self.host_prefix)
    }

    async fn resolve(&self, reference: &str) -> Resolution {
        match self.fetch_galley_href(reference).await {
            Some(href) => Resolution::DirectUrl(href),
            None => {
                debug!(reference, "no PDF gallery link found, unsupported");
                Resolution::Unsupported
            }
        }
    }
}
