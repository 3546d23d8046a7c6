//! # tgbrief
//!
//! Turns raw Telegram news exports into a compact, clean JSON report that a
//! prompt-assembly step can paste straight into an LLM prompt.
//!
//! ## Overview
//!
//! The pipeline is a single pass over the input, in input order:
//!
//! 1. **Clean** the text: emoji, mentions, links and separators go away,
//!    whitespace is collapsed
//! 2. **Filter**: short messages, excluded groups, excluded regions and
//!    promotional posts are dropped
//! 3. **Normalize** the timestamp to ISO-8601 (unparseable → dropped)
//! 4. **Aggregate** the covered duration over the survivors
//!
//! Malformed records are skipped, never fatal. Only an input document that
//! is not a sequence of records aborts a run.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashSet;
//! use tgbrief::{RawMessage, transform};
//!
//! let body = "Officials confirmed the bridge will reopen on Monday after repairs \
//!             that took most of the winter, according to the city transport office 🚧";
//! let messages = vec![
//!     RawMessage::new("CityNews", body, "2024-01-01T08:00:00"),
//!     RawMessage::new("CityNews", body, "2024-01-01T12:00:00"),
//!     RawMessage::new("Promo", body, "2024-01-01T09:00:00"),
//! ];
//!
//! let excluded: HashSet<String> = ["Promo".to_string()].into();
//! let report = transform(&messages, &excluded);
//!
//! assert_eq!(report.message_count, 2);
//! assert_eq!(report.duration, "4 hours");
//! assert!(!report.messages[0].text.contains('🚧'));
//! ```
//!
//! ## Configured runs
//!
//! ```rust,no_run
//! use tgbrief::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = TransformConfig::from_json_file("tgbrief.json")?;
//!     let records = load_file("messages.json", &config.schema)?;
//!
//!     let outcome = Transformer::new(&config)?.process(records);
//!     write_json(&outcome.report, "messages_processed.json", &OutputConfig::new())?;
//!
//!     println!("kept {} of {}", outcome.stats.kept, outcome.stats.input);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`message`] — [`RawMessage`], [`CleanedMessage`]
//! - [`config`] — [`TransformConfig`](config::TransformConfig), [`RecordSchema`](config::RecordSchema)
//! - [`parsing`] — record arrays and digest envelopes
//! - [`core`] — cleaning, filtering, timestamps, the pipeline, output
//! - [`error`] — [`BriefError`], [`RecordError`](error::RecordError), [`Result`]
//! - [`cli`] — CLI arguments (feature `cli`)
//! - [`prelude`] — Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod message;
pub mod parsing;

// Re-export the main types at the crate root for convenience
pub use crate::core::processor::{Report, transform};
pub use error::{BriefError, Result};
pub use message::{CleanedMessage, RawMessage};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use tgbrief::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{CleanedMessage, RawMessage};

    pub use crate::error::{BriefError, RecordError, Result};

    pub use crate::config::{RecordSchema, TransformConfig};

    pub use crate::parsing::{load_file, load_records, load_str};

    pub use crate::core::clean::clean_text;
    pub use crate::core::filter::{DropReason, FilterRules};
    pub use crate::core::output::{OutputConfig, to_json, write_json};
    pub use crate::core::processor::{
        Outcome, Report, TimeWindow, TransformStats, Transformer, transform,
    };
}
