//! Newsletter Digest main entry point
//!
//! This is the command-line interface for building a newsletter digest from an
//! exported batch of messages.

use clap::Parser;
use newsletter_digest::config::load_config_with_hash;
use newsletter_digest::output::write_digest;
use newsletter_digest::pipeline::{print_statistics, JsonFileSource, Pipeline};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Newsletter Digest: a day-by-day digest of your newsletters
///
/// Reads a JSON batch of messages, keeps the ones that look like newsletters,
/// summarizes them, resolves their links to page titles, and writes the result
/// grouped by day.
#[derive(Parser, Debug)]
#[command(name = "newsletter-digest")]
#[command(version = "1.0.0")]
#[command(about = "Builds a day-bucketed newsletter digest", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// JSON file containing the message batch
    #[arg(short, long, value_name = "FILE", required_unless_present = "dry_run")]
    input: Option<PathBuf>,

    /// Only include messages sent within this many hours
    #[arg(long, value_name = "HOURS")]
    since_hours: Option<i64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the rules that would be applied
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let input = cli
        .input
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--input is required"))?;

    handle_digest(&config, input, cli.since_hours, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("newsletter_digest=info,warn"),
            1 => EnvFilter::new("newsletter_digest=debug,info"),
            2 => EnvFilter::new("newsletter_digest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the configured rules
fn handle_dry_run(config: &newsletter_digest::Config) {
    println!("=== Newsletter Digest Dry Run ===\n");

    println!("Classifier:");
    println!(
        "  Newsletter domains: {}",
        config.classifier.newsletter_domains.join(", ")
    );
    println!(
        "  Subject keywords: {}",
        config.classifier.subject_keywords.join(", ")
    );
    println!(
        "  Excluded domains: {}",
        config.classifier.excluded_domains.join(", ")
    );

    println!("\nLinks:");
    println!("  Max per message: {}", config.links.max_links_per_message);
    println!(
        "  Max concurrent resolutions: {}",
        config.links.max_concurrent_resolutions
    );
    println!("  Title fetch timeout: {}ms", config.links.title_fetch_timeout);
    println!("  Redirect max hops: {}", config.links.redirect_max_hops);

    println!("\nSummarizer:");
    println!("  Endpoint: {}", config.summarizer.endpoint);
    println!("  Model: {}", config.summarizer.model);
    println!(
        "  API key: {} ({})",
        config.summarizer.api_key_env,
        if std::env::var(&config.summarizer.api_key_env).is_ok() {
            "set"
        } else {
            "not set"
        }
    );

    println!("\nDigest:");
    println!("  UTC offset: {} minutes", config.digest.utc_offset_minutes);
    println!("  JSON: {}", config.output.digest_path);
    println!("  Markdown: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
}

/// Converts `--since-hours` into a window, rejecting values chrono cannot hold
fn recency_window(hours: i64) -> anyhow::Result<chrono::Duration> {
    chrono::Duration::try_hours(hours)
        .ok_or_else(|| anyhow::anyhow!("--since-hours is out of range: {}", hours))
}

/// Handles the main digest operation
async fn handle_digest(
    config: &newsletter_digest::Config,
    input: &Path,
    since_hours: Option<i64>,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut source = JsonFileSource::load(input)?;
    if let Some(hours) = since_hours {
        tracing::info!("Keeping messages from the past {} hours", hours);
        source = source.within_window(recency_window(hours)?, chrono::Utc::now());
    }

    let pipeline = Pipeline::from_config(config)?;

    let run = match pipeline.run(&source).await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!("Digest failed: {}", e);
            return Err(e.into());
        }
    };

    write_digest(&run.days, pipeline.aggregator().offset(), &config.output)?;

    if !quiet {
        print_statistics(&run.stats);
    }

    Ok(())
}
