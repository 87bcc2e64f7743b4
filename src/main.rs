//! Catalog-Harvest main entry point
//!
//! This is the command-line interface for the Catalog-Harvest scraper.

use anyhow::Context;
use catalog_harvest::config::{load_config_with_hash, read_seed_file, validate, Config};
use catalog_harvest::crawler::Harvester;
use catalog_harvest::output::JsonLinesEmitter;
use catalog_harvest::ErrorPolicy;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog-Harvest: a paginated catalog scraper
///
/// Reads catalog root URLs from a seed file, walks every listing page of
/// each catalog and prints one JSON record per item page on stdout.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version)]
#[command(about = "A paginated catalog scraper", long_about = None)]
struct Cli {
    /// Path to the seed file, one catalog URL per line
    #[arg(value_name = "SEEDS", default_value = "./ofs_urls.txt")]
    seeds: PathBuf,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the failure handling policy
    #[arg(long, value_enum)]
    error_policy: Option<ErrorPolicy>,

    /// Override the number of item pages fetched at once
    #[arg(long, value_name = "N")]
    item_concurrency: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and seeds and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    let seeds = read_seed_file(&cli.seeds)
        .with_context(|| format!("Failed to read seed file {}", cli.seeds.display()))?;
    tracing::info!("Loaded {} seed URLs from {}", seeds.len(), cli.seeds.display());

    if cli.dry_run {
        handle_dry_run(&config, &cli.seeds, &seeds);
        return Ok(());
    }

    handle_harvest(config, &seeds).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for records.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvest=info,warn"),
            1 => EnvFilter::new("catalog_harvest=debug,info"),
            2 => EnvFilter::new("catalog_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(policy) = cli.error_policy {
        config.crawler.error_policy = policy;
    }
    if let Some(concurrency) = cli.item_concurrency {
        config.crawler.item_concurrency = concurrency;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be harvested
fn handle_dry_run(config: &Config, seed_path: &Path, seeds: &[String]) {
    println!("=== Catalog-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Error policy: {:?}", config.crawler.error_policy);
    println!("  Item concurrency: {}", config.crawler.item_concurrency);
    match config.crawler.request_timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: none"),
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);

    println!("\nSelectors:");
    println!("  Pagination: {}", config.selectors.pagination);
    println!("  Post title: {}", config.selectors.post_title);
    println!("  Title: {}", config.selectors.title);
    println!(
        "  Download links: {} (suffix {})",
        config.selectors.download_links, config.selectors.archive_suffix
    );
    println!("  Info: {}", config.selectors.info);
    println!(
        "  Detail rows: {} / {}",
        config.selectors.detail_rows, config.selectors.detail_cells
    );
    println!("  Tags: {}", config.selectors.tags);

    println!("\nSeeds from {} ({}):", seed_path.display(), seeds.len());
    for seed in seeds {
        println!("  - {:?}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start harvesting {} catalogs", seeds.len());
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, seeds: &[String]) -> anyhow::Result<()> {
    let mut harvester = Harvester::new(config)?;
    let mut sink = JsonLinesEmitter::stdout();

    match harvester.run(seeds, &mut sink).await {
        Ok(()) => {
            tracing::info!("Harvest completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
