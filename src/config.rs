//! Immutable harvest configuration.
//!
//! Every option is enumerated and fixed at construction; engines receive the
//! config by reference and never mutate process-wide state. The current year
//! is deliberately NOT part of the config - it is a call-time parameter of
//! the query builder so the builder stays pure and testable.

use std::path::PathBuf;

/// Configuration for one harvest run (one keyword + source combination).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestConfig {
    /// Keyword to search for. Free text; URL encoding is delegated to the
    /// HTTP layer.
    pub keyword: String,
    /// Result source filters, combined with logical OR in the query text.
    /// Empty means no source filter.
    pub sources: Vec<String>,
    /// Number of results to harvest (pages are fetched in steps of 10).
    pub result_count: usize,
    /// Column to sort the final table by (descending).
    pub sort_by: String,
    /// Minimum publication year filter. `None` disables the year constraint.
    pub min_year: Option<u16>,
    /// Directory the table CSV is written into.
    pub output_dir: PathBuf,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            keyword: "machine learning".to_string(),
            sources: vec!["ACL".to_string()],
            result_count: 50,
            sort_by: "Citations".to_string(),
            min_year: Some(2000),
            output_dir: PathBuf::from("."),
        }
    }
}

impl HarvestConfig {
    /// Splits a comma-separated source filter string into the sources list.
    ///
    /// Empty segments are dropped, so `"ACL,,EMNLP"` yields two sources.
    #[must_use]
    pub fn parse_sources(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_documented_defaults() {
        let config = HarvestConfig::default();
        assert_eq!(config.keyword, "machine learning");
        assert_eq!(config.sources, vec!["ACL".to_string()]);
        assert_eq!(config.result_count, 50);
        assert_eq!(config.sort_by, "Citations");
        assert_eq!(config.min_year, Some(2000));
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_parse_sources_splits_on_commas() {
        assert_eq!(
            HarvestConfig::parse_sources("ACL,EMNLP,NAACL"),
            vec!["ACL", "EMNLP", "NAACL"]
        );
    }

    #[test]
    fn test_parse_sources_drops_empty_segments() {
        assert_eq!(
            HarvestConfig::parse_sources("ACL, ,EMNLP,"),
            vec!["ACL", "EMNLP"]
        );
    }

    #[test]
    fn test_parse_sources_empty_input_yields_no_sources() {
        assert!(HarvestConfig::parse_sources("").is_empty());
    }
}
