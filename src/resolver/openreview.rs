//! Open-review resolver: discussion view to document view.

use async_trait::async_trait;

use super::{Resolution, Resolver};

/// Host marker for the open review platform.
const OPENREVIEW_MARKER: &str = "openreview.net";

/// Path segment serving the discussion view of a submission.
const FORUM_SEGMENT: &str = "forum";

/// Path segment serving the document view.
const PDF_SEGMENT: &str = "pdf";

/// Rule 2: open-review references resolve by swapping the discussion-view
/// path segment for the document-view segment. Pure; no network access.
#[derive(Debug, Default)]
pub struct OpenReviewResolver;

impl OpenReviewResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Resolver for OpenReviewResolver {
    fn name(&self) -> &'static str {
        "openreview"
    }

    fn matches(&self, reference: &str) -> bool {
        reference.contains(OPENREVIEW_MARKER)
    }

    async fn resolve(&self, reference: &str) -> Resolution {
        Resolution::DirectUrl(reference.replacen(FORUM_SEGMENT, PDF_SEGMENT, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forum_view_rewritten_to_pdf_view() {
        let resolver = OpenReviewResolver::new();
        let reference = "https://openreview.net/forum?id=AbCdEf123";
        assert!(resolver.matches(reference));
        assert_eq!(
            resolver.resolve(reference).await,
            Resolution::DirectUrl("https://openreview.net/pdf?id=AbCdEf123".to_string())
        );
    }

    #[tokio::test]
    async fn test_only_first_occurrence_replaced() {
        let resolver = OpenReviewResolver::new();
        assert_eq!(
            resolver
                .resolve("https://openreview.net/forum?id=forum42")
                .await,
            Resolution::DirectUrl("https://openreview.net/pdf?id=forum42".to_string())
        );
    }

    #[test]
    fn test_other_hosts_not_claimed() {
        let resolver = OpenReviewResolver::new();
        assert!(!resolver.matches("https://example.com/forum?id=1"));
    }
}
