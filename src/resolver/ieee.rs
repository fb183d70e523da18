//! Digital-library resolver: abstract pages to full-text stamp pages.

use async_trait::async_trait;

use super::{Resolution, Resolver};

/// Host marker for the digital library.
const IEEE_MARKER: &str = "ieeexplore.ieee.org";

/// Path segment serving the abstract page.
const ABSTRACT_SEGMENT: &str = "abstract";

/// Path segment serving the full-text stamp page.
const STAMP_SEGMENT: &str = "stamp";

/// Rule 3: digital-library abstract references resolve by stripping
/// trailing slashes and swapping the abstract path segment for the stamp
/// segment. Pure; no network access. Best-effort string rewrite, kept
/// byte-compatible with the historical behavior.
#[derive(Debug, Default)]
pub struct IeeeResolver;

impl IeeeResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Resolver for IeeeResolver {
    fn name(&self) -> &'static str {
        "ieee"
    }

    fn matches(&self, reference: &str) -> bool {
        reference.contains(IEEE_MARKER) && reference.contains(ABSTRACT_SEGMENT)
    }

    async fn resolve(&self, reference: &str) -> Resolution {
        let trimmed = reference.trim_end_matches('/');
        Resolution::DirectUrl(trimmed.replacen(ABSTRACT_SEGMENT, STAMP_SEGMENT, 1))
    }
}
