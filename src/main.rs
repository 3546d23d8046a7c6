//! # tgbrief CLI
//!
//! Command-line interface for the tgbrief library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tgbrief::cli::Args;
use tgbrief::config::TransformConfig;
use tgbrief::core::{OutputConfig, Transformer, write_json};
use tgbrief::parsing::load_file;
use tgbrief::BriefError;

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so stdout stays a clean summary.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), BriefError> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    let base = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            TransformConfig::from_json_file(path)?
        }
        None => TransformConfig::default(),
    };
    let config = args.apply_overrides(base);
    let transformer = Transformer::new(&config)?;

    let say = |line: String| {
        if !args.quiet {
            println!("{line}");
        }
    };

    say(format!("📰 tgbrief v{}", env!("CARGO_PKG_VERSION")));
    say("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".to_string());
    say(format!("📂 Input:   {}", args.input.display()));
    say(format!("💾 Output:  {}", args.output.display()));
    if let Some(path) = &args.config {
        say(format!("⚙️  Config:  {}", path.display()));
    }
    if !config.excluded_groups.is_empty() {
        let groups: Vec<&str> = config.excluded_groups.iter().map(String::as_str).collect();
        say(format!("🚫 Exclude: {}", groups.join(", ")));
    }
    say(format!("📏 Length:  > {} chars", config.min_length));
    say(String::new());

    say("⏳ Loading records...".to_string());
    let records = load_file(&args.input, &config.schema)?;
    say(format!("   Found {} records", records.len()));

    say("🧹 Cleaning and filtering...".to_string());
    let outcome = transformer.process(records);
    let stats = &outcome.stats;
    let report = &outcome.report;

    let output_config = if args.compact {
        OutputConfig::new().compact()
    } else {
        OutputConfig::new()
    };
    write_json(report, &args.output, &output_config)?;

    say(String::new());
    say(format!("✅ Done! Output saved to {}", args.output.display()));
    say(String::new());
    say("📊 Summary:".to_string());
    say(format!("   Input:     {} records", stats.input));
    say(format!(
        "   Kept:      {} messages ({:.1}% dropped)",
        stats.kept,
        stats.drop_ratio()
    ));
    for (label, count) in [
        ("malformed", stats.malformed),
        ("too short", stats.too_short),
        ("excluded group", stats.excluded_group),
        ("excluded content", stats.excluded_content),
        ("promotional", stats.promotional),
        ("bad timestamp", stats.bad_timestamp),
    ] {
        if count > 0 {
            say(format!("   - {label}: {count}"));
        }
    }
    match &report.time_window {
        Some(window) => say(format!(
            "   Window:    {} to {} ({})",
            window.start, window.end, report.duration
        )),
        None => say(format!("   Duration:  {}", report.duration)),
    }

    let top = stats.top_groups(10);
    if !top.is_empty() {
        say(String::new());
        say("👥 Messages by group:".to_string());
        for (group, count) in top {
            say(format!("   {group}: {count}"));
        }
    }

    say(String::new());
    say(format!(
        "⚡ Total time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    ));

    Ok(())
}
