//! Configuration for the transformer and the input boundary.
//!
//! Everything the pipeline decides on is data in [`TransformConfig`]: the
//! excluded groups, the region and promotional word lists, the length
//! threshold and the [`RecordSchema`] agreed with the upstream extractor.
//! Defaults carry no business word lists; see `config/tgbrief.example.json`
//! for a filled-in deployment config.
//!
//! # Example
//!
//! ```rust
//! use tgbrief::config::TransformConfig;
//!
//! let config = TransformConfig::new()
//!     .with_excluded_group("Promo")
//!     .with_min_length(80)
//!     .with_promo_phrase("subscribe");
//!
//! assert!(config.validate().is_ok());
//! ```
//!
//! # File format
//!
//! Every key is optional:
//!
//! ```json
//! {
//!   "excluded_groups": ["Promo"],
//!   "excluded_terms": ["tehran"],
//!   "promo_phrases": ["subscribe", "donate"],
//!   "promo_patterns": ["(?i)use code \\w+"],
//!   "promo_threshold": 1,
//!   "min_length": 100,
//!   "schema": {
//!     "group_field": "group",
//!     "text_field": "text",
//!     "timestamp_field": "timestamp",
//!     "timestamp_formats": ["%Y-%m-%d %H:%M:%S"]
//!   }
//! }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BriefError, Result};

/// Messages must be strictly longer than this many characters after cleaning.
pub const DEFAULT_MIN_LENGTH: usize = 100;

/// Field names and timestamp formats of the upstream record contract.
///
/// Each input record is a JSON object. `group_field` and `text_field` must
/// hold strings (the text may also be a Telegram rich-text array);
/// `timestamp_field` holds a string or a unix-seconds number.
///
/// Timestamp strings are tried as RFC 3339 first, then against each entry
/// of `timestamp_formats` (chrono `strftime` syntax, interpreted as UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordSchema {
    /// Name of the group/channel field (default: `group`)
    pub group_field: String,

    /// Name of the message body field (default: `text`)
    pub text_field: String,

    /// Name of the timestamp field (default: `timestamp`)
    pub timestamp_field: String,

    /// Naive timestamp layouts accepted after RFC 3339
    pub timestamp_formats: Vec<String>,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            group_field: "group".to_string(),
            text_field: "text".to_string(),
            timestamp_field: "timestamp".to_string(),
            timestamp_formats: vec![
                "%Y-%m-%dT%H:%M:%S%.f".to_string(),
                "%Y-%m-%d %H:%M:%S%.f".to_string(),
                "[%Y-%m-%d %H:%M:%S]".to_string(),
            ],
        }
    }
}

impl RecordSchema {
    /// Creates the default schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the three field names at once.
    #[must_use]
    pub fn with_fields(
        mut self,
        group: impl Into<String>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        self.group_field = group.into();
        self.text_field = text.into();
        self.timestamp_field = timestamp.into();
        self
    }

    /// Appends an accepted timestamp layout.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_formats.push(format.into());
        self
    }
}

/// Settings for one transform run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Groups whose messages are always dropped (case-insensitive)
    pub excluded_groups: BTreeSet<String>,

    /// Region/topic terms; a message containing any of them is dropped
    pub excluded_terms: Vec<String>,

    /// Promotional phrases, matched as case-insensitive substrings
    pub promo_phrases: Vec<String>,

    /// Promotional regular expressions
    pub promo_patterns: Vec<String>,

    /// Distinct promo hits needed to call a message promotional (default: 1)
    pub promo_threshold: usize,

    /// Cleaned text must be longer than this, in characters (default: 100)
    pub min_length: usize,

    /// Input record contract
    pub schema: RecordSchema,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            excluded_groups: BTreeSet::new(),
            excluded_terms: Vec::new(),
            promo_phrases: Vec::new(),
            promo_patterns: Vec::new(),
            promo_threshold: 1,
            min_length: DEFAULT_MIN_LENGTH,
            schema: RecordSchema::default(),
        }
    }
}

impl TransformConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Missing keys take their default values. The result is validated.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| BriefError::json_in(e, path))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings that serde alone cannot enforce.
    ///
    /// Promo patterns are compiled (and reported) when a
    /// [`Transformer`](crate::core::Transformer) is built from this config.
    pub fn validate(&self) -> Result<()> {
        let schema = &self.schema;
        for (name, value) in [
            ("schema.group_field", &schema.group_field),
            ("schema.text_field", &schema.text_field),
            ("schema.timestamp_field", &schema.timestamp_field),
        ] {
            if value.trim().is_empty() {
                return Err(BriefError::invalid_config(format!("{name} must not be empty")));
            }
        }

        if self.promo_threshold == 0 {
            return Err(BriefError::invalid_config(
                "promo_threshold must be at least 1",
            ));
        }

        if self.excluded_terms.iter().any(|t| t.trim().is_empty())
            || self.promo_phrases.iter().any(|p| p.trim().is_empty())
        {
            return Err(BriefError::invalid_config(
                "excluded_terms and promo_phrases must not contain empty entries",
            ));
        }

        Ok(())
    }

    /// Adds a group to the exclusion set.
    #[must_use]
    pub fn with_excluded_group(mut self, group: impl Into<String>) -> Self {
        self.excluded_groups.insert(group.into());
        self
    }

    /// Adds several groups to the exclusion set.
    #[must_use]
    pub fn with_excluded_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Adds a region/topic exclusion term.
    #[must_use]
    pub fn with_excluded_term(mut self, term: impl Into<String>) -> Self {
        self.excluded_terms.push(term.into());
        self
    }

    /// Adds a promotional phrase.
    #[must_use]
    pub fn with_promo_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.promo_phrases.push(phrase.into());
        self
    }

    /// Adds a promotional regular expression.
    #[must_use]
    pub fn with_promo_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.promo_patterns.push(pattern.into());
        self
    }

    /// Sets how many distinct promo hits mark a message as promotional.
    #[must_use]
    pub fn with_promo_threshold(mut self, threshold: usize) -> Self {
        self.promo_threshold = threshold;
        self
    }

    /// Sets the length threshold.
    #[must_use]
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Replaces the record schema.
    #[must_use]
    pub fn with_schema(mut self, schema: RecordSchema) -> Self {
        self.schema = schema;
        self
    }
}
