//! Report writers.
//!
//! - [`write_json`] / [`to_json`] - the report as one JSON object
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> tgbrief::Result<()> {
//! use std::collections::HashSet;
//! use tgbrief::core::output::{OutputConfig, write_json};
//! use tgbrief::{RawMessage, transform};
//!
//! let report = transform(&[RawMessage::new("NewsA", "...", "2024-01-01T00:00:00")], &HashSet::new());
//! write_json(&report, "messages_processed.json", &OutputConfig::new())?;
//! # Ok(())
//! # }
//! ```

mod json_writer;

pub use json_writer::{to_json, write_json};

/// Controls how the report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Indent the JSON (default: true)
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl OutputConfig {
    /// Pretty-printed output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line JSON, for piping into other tools.
    #[must_use]
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}
