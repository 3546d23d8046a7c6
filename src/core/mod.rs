//! Core processing logic for tgbrief.
//!
//! This module contains:
//! - [`clean`] - Composable text-cleaning rules
//! - [`filter`] - Retention rules (group, length, region, promo)
//! - [`timestamp`] - Timestamp parsing and ISO-8601 normalization
//! - [`processor`] - The transform pipeline and the [`Report`]
//! - [`output`] - JSON report writer
//!
//! # Quick Start
//!
//! ```rust
//! use tgbrief::core::{Transformer, clean_text, to_json, OutputConfig};
//! use tgbrief::config::TransformConfig;
//! ```

pub mod clean;
pub mod filter;
pub mod output;
pub mod processor;
pub mod timestamp;

// Re-export main types for convenience
pub use clean::{CleanRule, clean_text};
pub use filter::{DropReason, FilterRules};
pub use output::{OutputConfig, to_json, write_json};
pub use processor::{
    Outcome, RecordResult, Report, TimeWindow, TransformStats, Transformer, format_duration,
    transform,
};
pub use timestamp::{parse_timestamp, to_iso};
