//! Frontier-Crawler main entry point
//!
//! This is the command-line interface for the concurrent crawler.

use anyhow::{Context, Result};
use clap::Parser;
use frontier_crawler::config::{load_config_with_hash, validate, Config};
use frontier_crawler::crawler::Engine;
use frontier_crawler::output::{print_statistics, ConsoleSink, DiscardSink, ResultSink};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Frontier-Crawler: a bounded, rate-limited concurrent web crawler
///
/// Crawls outward from a seed URL with a fixed pool of workers, visiting
/// each URL at most once, pacing requests per host, and stopping at a
/// maximum link depth.
#[derive(Parser, Debug)]
#[command(name = "frontier-crawler")]
#[command(version)]
#[command(about = "A bounded, rate-limited concurrent web crawler", long_about = None)]
struct Cli {
    /// Seed URL; `https://` is assumed when no scheme is given
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum link depth (pages at this depth are not fetched)
    #[arg(long)]
    max_depth: Option<u32>,

    /// Number of concurrent workers
    #[arg(long)]
    workers: Option<u32>,

    /// Minimum delay between requests to one host, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Stop after this many fetch attempts (0 = unlimited)
    #[arg(long)]
    max_pages: Option<u64>,

    /// Only follow links that stay on the seed's host
    #[arg(long)]
    stay_on_host: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the effective configuration and exit without crawling
    #[arg(long, conflicts_with = "stats_only")]
    dry_run: bool,

    /// Suppress per-page output and print only the final statistics
    #[arg(long)]
    stats_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;
    let seed = seed_url(&cli.url);

    if cli.dry_run {
        print_dry_run(&config, &seed);
        return Ok(());
    }

    handle_crawl(&config, &seed, cli.stats_only).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("frontier_crawler=info,warn"),
            1 => EnvFilter::new("frontier_crawler=debug,info"),
            2 => EnvFilter::new("frontier_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file (or defaults), applies CLI overrides, and validates
fn load_effective_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let crawler = &mut config.crawler;
    if let Some(max_depth) = cli.max_depth {
        crawler.max_depth = max_depth;
    }
    if let Some(workers) = cli.workers {
        crawler.workers = workers;
    }
    if let Some(delay) = cli.delay_ms {
        crawler.per_host_delay = delay;
    }
    if let Some(max_pages) = cli.max_pages {
        crawler.max_pages = max_pages;
    }
    if cli.stay_on_host {
        crawler.stay_on_host = true;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Prefixes `https://` when the argument carries no scheme
fn seed_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    }
}

/// Handles the --dry-run mode: shows what would be crawled
fn print_dry_run(config: &Config, seed: &str) {
    let crawler = &config.crawler;

    println!("=== Frontier-Crawler Dry Run ===\n");

    println!("Seed URL: {}\n", seed);

    println!("Crawler Configuration:");
    println!("  Max depth: {}", crawler.max_depth);
    println!("  Workers: {}", crawler.workers);
    println!("  Per-host delay: {}ms", crawler.per_host_delay);
    println!("  Fetch timeout: {}s", crawler.fetch_timeout);
    println!("  Frontier capacity: {}", crawler.frontier_capacity);
    println!("  Results capacity: {}", crawler.results_capacity);
    println!("  Idle poll: {}ms", crawler.idle_poll);
    match crawler.page_budget() {
        Some(budget) => println!("  Page budget: {}", budget),
        None => println!("  Page budget: unlimited"),
    }
    println!("  Stay on host: {}", crawler.stay_on_host);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, seed: &str, stats_only: bool) -> Result<()> {
    let engine = Engine::new(config).context("failed to build crawl engine")?;

    let shutdown = engine.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.shutdown();
        }
    });

    let mut sink: Box<dyn ResultSink> = if stats_only {
        Box::new(DiscardSink)
    } else {
        Box::new(ConsoleSink::stdout())
    };

    let summary = engine
        .crawl(seed, &mut sink)
        .await
        .with_context(|| format!("crawl of {} failed", seed))?;

    println!();
    print_statistics(&summary);

    Ok(())
}
