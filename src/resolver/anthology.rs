//! Open-repository resolver: anthology paths get the document suffix.

use async_trait::async_trait;

use super::{DOCUMENT_SUFFIX, Resolution, Resolver};

/// Host path marker for the open anthology repository.
const ANTHOLOGY_MARKER: &str = "aclanthology.org/";

/// Rule 1: references into the open anthology repository resolve by
/// stripping any trailing slash and appending the document suffix.
/// Pure; no network access.
#[derive(Debug, Default)]
pub struct AnthologyResolver;

impl AnthologyResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Resolver for AnthologyResolver {
    fn name(&self) -> &'static str {
        "anthology"
    }

    fn matches(&self, reference: &str) -> bool {
        reference.contains(ANTHOLOGY_MARKER)
    }

    async fn resolve(&self, reference: &str) -> Resolution {
        Resolution::DirectUrl(format!(
            "{}{DOCUMENT_SUFFIX}",
            reference.trim_end_matches('/')
        ))
    }
}
