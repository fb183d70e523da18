//! Artifact resolution: reference strings to direct document URLs.
//!
//! A [`ResolverChain`] is a priority-ordered rule chain, not a generic
//! dispatcher: rules are evaluated strictly in registration order and the
//! FIRST rule whose `matches` accepts the reference decides the outcome,
//! even if that outcome is [`Resolution::Unsupported`]. Order affects
//! correctness (a URL can incidentally satisfy a later rule's suffix check
//! before a more specific rule is tried), so new source types are added as
//! new prioritized rules, never by mutating or reordering existing ones.
//!
//! Rules 1-3 and 5 are pure string rewrites; rule 4 ([`OjsResolver`])
//! performs a side-effecting secondary fetch whose every failure mode
//! degrades to `Unsupported`, never a hard error.

mod anthology;
mod direct;
mod ieee;
mod ojs;
mod openreview;

pub use anthology::AnthologyResolver;
pub use direct::DirectResolver;
pub use ieee::IeeeResolver;
pub use ojs::OjsResolver;
pub use openreview::OpenReviewResolver;

use async_trait::async_trait;
use tracing::debug;

/// Extension appended to or expected on direct document URLs.
pub const DOCUMENT_SUFFIX: &str = ".pdf";

/// Outcome of resolving one reference. Ephemeral: never persisted
/// structurally, only aggregated into counts and title lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A directly fetchable document URL.
    DirectUrl(String),
    /// The reference style is not recognized; reported, not an error.
    Unsupported,
}

/// One rule in the chain.
///
/// `matches` must be cheap and side-effect free; `resolve` is only invoked
/// on the first matching rule and may be effectful (rule 4).
#[async_trait]
pub trait Resolver: Send + Sync {
    /// The rule's name, for logging.
    fn name(&self) -> &str;

    /// Returns true if this rule claims the reference.
    fn matches(&self, reference: &str) -> bool;

    /// Maps the reference to a document URL or `Unsupported`.
    async fn resolve(&self, reference: &str) -> Resolution;
}

/// Priority-ordered chain of resolvers; first match wins.
#[derive(Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn Resolver>>,
}

impl std::fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverChain")
            .field(
                "resolvers",
                &self.resolvers.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ResolverChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule; registration order is evaluation order.
    pub fn register(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Resolves a reference through the chain.
    ///
    /// The first rule whose `matches` accepts the reference is final; a
    /// reference no rule claims is `Unsupported`.
    pub async fn resolve(&self, reference: &str) -> Resolution {
        for resolver in &self.resolvers {
            if resolver.matches(reference) {
                let resolution = resolver.resolve(reference).await;
                debug!(rule = resolver.name(), reference, ?resolution, "reference resolved");
                return resolution;
            }
        }
        debug!(reference, "no rule claims reference");
        Resolution::Unsupported
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

/// Builds the default rule chain in its fixed priority order.
#[must_use]
pub fn build_default_chain() -> ResolverChain {
    let mut chain = ResolverChain::new();
    chain.register(Box::new(AnthologyResolver::new()));
    chain.register(Box::new(OpenReviewResolver::new()));
    chain.register(Box::new(IeeeResolver::new()));
    chain.register(Box::new(OjsResolver::new()));
    chain.register(Box::new(DirectResolver::new()));
    chain
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_chain_resolves_anthology_reference() {
        let chain = build_default_chain();
        let resolution = chain
            .resolve("https://aclanthology.org/2021.acl-long.1/")
            .await;
        assert_eq!(
            resolution,
            Resolution::DirectUrl("https://aclanthology.org/2021.acl-long.1.pdf".to_string())
        );
    }

    #[tokio::test]
    async fn test_default_chain_unmatched_reference_is_unsupported() {
        let chain = build_default_chain();
        let resolution = chain.resolve("https://example.com/no-match").await;
        assert_eq!(resolution, Resolution::Unsupported);
    }

    #[tokio::test]
    async fn test_first_match_wins_over_later_suffix_rule() {
        // An anthology URL that already ends in .pdf would also satisfy the
        // passthrough rule, but rule order must keep the anthology rewrite
        // in charge.
        let chain = build_default_chain();
        let resolution = chain.resolve("https://aclanthology.org/x.pdf").await;
        assert_eq!(
            resolution,
            Resolution::DirectUrl("https://aclanthology.org/x.pdf.pdf".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_chain_is_unsupported() {
        let chain = ResolverChain::new();
        assert!(chain.is_empty());
        assert_eq!(
            chain.resolve("https://example.com/a.pdf").await,
            Resolution::Unsupported
        );
    }

    #[test]
    fn test_default_chain_registration_order() {
        let chain = build_default_chain();
        assert_eq!(chain.len(), 5);
        let debug = format!("{chain:?}");
        let positions: Vec<usize> = ["anthology", "openreview", "ieee", "ojs", "direct"]
            .iter()
            .map(|name| debug.find(name).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "order: {debug}");
    }
}
