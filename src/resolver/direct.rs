//! Passthrough resolver for references that already point at a document.

use async_trait::async_trait;

use super::{DOCUMENT_SUFFIX, Resolution, Resolver};

/// Rule 5: references already ending in the document suffix pass through
/// unchanged. Pure; no network access. Registered last so that more
/// specific rewrites always take precedence.
#[derive(Debug, Default)]
pub struct DirectResolver;

impl DirectResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Resolver for DirectResolver {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn matches(&self, reference: &str) -> bool {
        reference.ends_with(DOCUMENT_SUFFIX)
    }

    async fn resolve(&self, reference: &str) -> Resolution {
        Resolution::DirectUrl(reference.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_document_reference_passes_through_unchanged() {
        let resolver = DirectResolver::new();
        let reference = "https://example.com/papers/attention.pdf";
        assert!(resolver.matches(reference));
        assert_eq!(
            resolver.resolve(reference).await,
            Resolution::DirectUrl(reference.to_string())
        );
    }

    #[test]
    fn test_non_document_reference_not_claimed() {
        let resolver = DirectResolver::new();
        assert!(!resolver.matches("https://example.com/papers/attention"));
        assert!(!resolver.matches("https://example.com/attention.pdf?download=1"));
    }
}
