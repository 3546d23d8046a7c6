//! Retention rules for cleaned messages.
//!
//! [`FilterRules`] is compiled once from a [`TransformConfig`] and then
//! answers a single question per message: keep it, or which
//! [`DropReason`] rejects it.
//!
//! # Checks
//!
//! | Check | Config key | Dropped when |
//! |-------|------------|--------------|
//! | Group | `excluded_groups` | group equals an excluded name (case-insensitive) |
//! | Length | `min_length` | cleaned text has `<= min_length` characters |
//! | Region | `excluded_terms` | text contains an excluded term (case-insensitive) |
//! | Promo | `promo_phrases`, `promo_patterns`, `promo_threshold` | at least `promo_threshold` distinct promo hits |
//!
//! All checks are combined with AND logic: a message must pass every one.
//!
//! # Example
//!
//! ```
//! use tgbrief::config::TransformConfig;
//! use tgbrief::core::filter::{DropReason, FilterRules};
//!
//! # fn main() -> tgbrief::Result<()> {
//! let config = TransformConfig::new()
//!     .with_excluded_group("Promo")
//!     .with_min_length(10);
//! let rules = FilterRules::from_config(&config)?;
//!
//! assert_eq!(rules.check("promo", "long enough text here"), Err(DropReason::ExcludedGroup));
//! assert_eq!(rules.check("NewsA", "short"), Err(DropReason::TooShort));
//! assert!(rules.check("NewsA", "long enough text here").is_ok());
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;
use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::config::TransformConfig;
use crate::error::{BriefError, Result};

/// Why a record did not make it into the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The record could not be decoded (missing/mistyped fields)
    Malformed,
    /// Cleaned text is not longer than the threshold
    TooShort,
    /// The group is in the exclusion set
    ExcludedGroup,
    /// The text mentions an excluded region/topic term
    ExcludedContent,
    /// The text matches the promotional heuristic
    Promotional,
    /// The timestamp matches no accepted layout
    BadTimestamp,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DropReason::Malformed => "malformed record",
            DropReason::TooShort => "text too short",
            DropReason::ExcludedGroup => "excluded group",
            DropReason::ExcludedContent => "excluded content",
            DropReason::Promotional => "promotional",
            DropReason::BadTimestamp => "unparseable timestamp",
        };
        f.write_str(s)
    }
}

/// Compiled retention rules.
#[derive(Debug, Clone)]
pub struct FilterRules {
    min_length: usize,
    excluded_groups: HashSet<String>,
    excluded_terms: Vec<String>,
    promo_phrases: Vec<String>,
    promo_patterns: Vec<Regex>,
    promo_threshold: usize,
}

impl FilterRules {
    /// Compiles the rules of a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BriefError::Pattern`] if a promo pattern does not compile,
    /// or [`BriefError::InvalidConfig`] if the config fails validation.
    pub fn from_config(config: &TransformConfig) -> Result<Self> {
        config.validate()?;

        let promo_patterns = config
            .promo_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|source| BriefError::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            min_length: config.min_length,
            excluded_groups: config
                .excluded_groups
                .iter()
                .map(String::as_str)
                .map(normalize_group)
                .collect(),
            excluded_terms: config.excluded_terms.iter().map(|t| t.to_lowercase()).collect(),
            promo_phrases: config.promo_phrases.iter().map(|p| p.to_lowercase()).collect(),
            promo_patterns,
            promo_threshold: config.promo_threshold,
        })
    }

    /// Default rules with only a group exclusion set.
    pub fn with_excluded_groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            min_length: crate::config::DEFAULT_MIN_LENGTH,
            excluded_groups: groups
                .into_iter()
                .map(|g| normalize_group(g.as_ref()))
                .collect(),
            excluded_terms: Vec::new(),
            promo_phrases: Vec::new(),
            promo_patterns: Vec::new(),
            promo_threshold: 1,
        }
    }

    /// Checks a group name and its cleaned text.
    pub fn check(&self, group: &str, cleaned_text: &str) -> std::result::Result<(), DropReason> {
        if self.is_excluded_group(group) {
            return Err(DropReason::ExcludedGroup);
        }
        if !self.is_long_enough(cleaned_text) {
            return Err(DropReason::TooShort);
        }

        let lowered = cleaned_text.to_lowercase();
        if self.excluded_terms.iter().any(|t| lowered.contains(t.as_str())) {
            return Err(DropReason::ExcludedContent);
        }
        if self.is_promotional_lowered(&lowered, cleaned_text) {
            return Err(DropReason::Promotional);
        }
        Ok(())
    }

    /// Returns `true` if the group is in the exclusion set.
    pub fn is_excluded_group(&self, group: &str) -> bool {
        !self.excluded_groups.is_empty() && self.excluded_groups.contains(&normalize_group(group))
    }

    /// Returns `true` if the text has more than `min_length` characters.
    pub fn is_long_enough(&self, cleaned_text: &str) -> bool {
        cleaned_text.chars().nth(self.min_length).is_some()
    }

    /// Returns `true` if the text reaches the promotional threshold.
    pub fn is_promotional(&self, cleaned_text: &str) -> bool {
        self.is_promotional_lowered(&cleaned_text.to_lowercase(), cleaned_text)
    }

    /// Counts distinct promo phrases and patterns found in the text.
    pub fn promo_hits(&self, cleaned_text: &str) -> usize {
        self.promo_hits_lowered(&cleaned_text.to_lowercase(), cleaned_text)
    }

    fn is_promotional_lowered(&self, lowered: &str, original: &str) -> bool {
        self.promo_hits_lowered(lowered, original) >= self.promo_threshold
    }

    fn promo_hits_lowered(&self, lowered: &str, original: &str) -> usize {
        let phrase_hits = self
            .promo_phrases
            .iter()
            .filter(|p| lowered.contains(p.as_str()))
            .count();
        let pattern_hits = self
            .promo_patterns
            .iter()
            .filter(|re| re.is_match(original))
            .count();
        phrase_hits + pattern_hits
    }
}

fn normalize_group(group: &str) -> String {
    group.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_text(prefix: &str) -> String {
        format!("{prefix} {}", "x".repeat(120))
    }

    fn rules(config: &TransformConfig) -> FilterRules {
        FilterRules::from_config(config).unwrap()
    }

    #[test]
    fn test_length_threshold_is_strict() {
        let r = rules(&TransformConfig::new());
        assert!(!r.is_long_enough(&"a".repeat(100)));
        assert!(r.is_long_enough(&"a".repeat(101)));
        // Characters, not bytes
        assert!(!r.is_long_enough(&"я".repeat(100)));
    }

    #[test]
    fn test_excluded_group_case_insensitive() {
        let r = rules(&TransformConfig::new().with_excluded_group("Promo"));
        assert!(r.is_excluded_group("Promo"));
        assert!(r.is_excluded_group(" PROMO "));
        assert!(!r.is_excluded_group("Promotions"));
        assert_eq!(r.check("promo", &long_text("news")), Err(DropReason::ExcludedGroup));
    }

    #[test]
    fn test_group_checked_before_length() {
        let r = rules(&TransformConfig::new().with_excluded_group("Promo"));
        assert_eq!(r.check("Promo", "short"), Err(DropReason::ExcludedGroup));
        assert_eq!(r.check("NewsB", "short"), Err(DropReason::TooShort));
    }

    #[test]
    fn test_excluded_terms() {
        let r = rules(&TransformConfig::new().with_excluded_term("Tel Aviv"));
        assert_eq!(
            r.check("NewsA", &long_text("Flights from TEL AVIV resumed")),
            Err(DropReason::ExcludedContent)
        );
        assert!(r.check("NewsA", &long_text("Flights resumed")).is_ok());
    }

    #[test]
    fn test_promo_phrases() {
        let r = rules(&TransformConfig::new().with_promo_phrase("subscribe"));
        assert_eq!(
            r.check("NewsA", &long_text("Please Subscribe to our feed")),
            Err(DropReason::Promotional)
        );
    }

    #[test]
    fn test_promo_threshold_counts_distinct_hits() {
        let config = TransformConfig::new()
            .with_promo_phrase("subscribe")
            .with_promo_phrase("donate")
            .with_promo_pattern(r"(?i)promo code \w+")
            .with_promo_threshold(2);
        let r = rules(&config);

        assert_eq!(r.promo_hits("subscribe subscribe subscribe"), 1);
        assert!(!r.is_promotional("subscribe subscribe subscribe"));
        assert!(r.is_promotional("subscribe and use PROMO CODE SAVE10"));
        assert_eq!(r.promo_hits("donate, subscribe, promo code X"), 3);
    }

    #[test]
    fn test_no_promo_config_never_promotional() {
        let r = rules(&TransformConfig::new());
        assert!(!r.is_promotional("subscribe donate advertising"));
    }

    #[test]
    fn test_invalid_promo_pattern() {
        let err = FilterRules::from_config(&TransformConfig::new().with_promo_pattern("(unclosed"))
            .unwrap_err();
        assert!(matches!(err, BriefError::Pattern { .. }));
    }

    #[test]
    fn test_drop_reason_display() {
        assert_eq!(DropReason::BadTimestamp.to_string(), "unparseable timestamp");
        assert_eq!(
            serde_json::to_string(&DropReason::ExcludedGroup).unwrap(),
            "\"excluded_group\""
        );
    }
}
