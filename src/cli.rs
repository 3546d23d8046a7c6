//! Command-line interface definition using clap.
//!
//! [`Args`] only describes the command line. Turning it into a
//! [`TransformConfig`] happens in [`Args::apply_overrides`], so the layering
//! (file, then environment/flags) can be tested without spawning the binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::TransformConfig;

/// Clean and filter Telegram news exports into a JSON report for LLM briefs.
#[derive(Parser, Debug, Clone)]
#[command(name = "tgbrief")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    tgbrief
    tgbrief raw.json -o processed.json
    tgbrief raw.json --exclude-group Promo --exclude-group Ads
    tgbrief raw.json -c tgbrief.json --min-length 80 --compact

ENVIRONMENT:
    TGBRIEF_EXCLUDED_GROUPS   comma-separated groups to drop
    TGBRIEF_MIN_LENGTH        length threshold in characters
    RUST_LOG                  log filter (default: warn)")]
pub struct Args {
    /// Path to the extractor's JSON output
    #[arg(default_value = "messages.json")]
    pub input: PathBuf,

    /// Path to write the report to
    #[arg(short, long, default_value = "messages_processed.json")]
    pub output: PathBuf,

    /// JSON configuration file (word lists, schema, thresholds)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Drop every message from this group (repeatable)
    #[arg(
        long = "exclude-group",
        value_name = "GROUP",
        env = "TGBRIEF_EXCLUDED_GROUPS",
        value_delimiter = ','
    )]
    pub exclude_groups: Vec<String>,

    /// Keep only messages longer than this many characters after cleaning
    #[arg(long, value_name = "CHARS", env = "TGBRIEF_MIN_LENGTH")]
    pub min_length: Option<usize>,

    /// Write single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// Do not print the summary
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Layers command-line and environment settings over a loaded config.
    ///
    /// Excluded groups are added to the configured ones; the length
    /// threshold replaces the configured one.
    pub fn apply_overrides(&self, config: TransformConfig) -> TransformConfig {
        let groups = self
            .exclude_groups
            .iter()
            .map(|g| g.trim())
            .filter(|g| !g.is_empty());
        let config = config.with_excluded_groups(groups);

        match self.min_length {
            Some(min_length) => config.with_min_length(min_length),
            None => config,
        }
    }
}
