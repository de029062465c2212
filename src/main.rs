//! Catalog-Walker main entry point
//!
//! This is the command-line interface for the Catalog-Walker crawler.

use catalog_walker::cache::{FsPageStore, MemoryPageStore, PageStore};
use catalog_walker::config::{load_or_default, Config};
use catalog_walker::crawler::crawl;
use catalog_walker::output::{print_statistics, MarkdownReport, ReportWriter};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Catalog-Walker: a cached, paginated catalog crawler
///
/// Catalog-Walker discovers the categories of a catalog site, walks every
/// category's paginated listing until it runs dry, and writes the
/// deduplicated series as a markdown report. Fetched pages are cached on
/// disk so repeated runs do not hit the network again.
#[derive(Parser, Debug)]
#[command(name = "catalog-walker")]
#[command(version = "1.0.0")]
#[command(about = "A cached, paginated catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

    /// Delete every cached page before crawling
    #[arg(long, conflicts_with = "no_cache")]
    fresh: bool,

    /// Keep fetched pages in memory only for this run
    #[arg(long)]
    no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => {
            match &cli.config {
                Some(path) => tracing::info!("Configuration loaded from {}", path.display()),
                None => tracing::info!("Using built-in configuration"),
            }
            config
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

    let store = open_store(&config, cli.fresh, cli.no_cache);
    handle_crawl(config, store, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_walker=info,warn"),
            1 => EnvFilter::new("catalog_walker=debug,info"),
            2 => EnvFilter::new("catalog_walker=trace,debug"),
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

/// Opens the page cache for this run
///
/// An unusable cache directory is not fatal: the run continues with an
/// in-memory store, so every page is fetched from the network.
fn open_store(config: &Config, fresh: bool, no_cache: bool) -> Arc<dyn PageStore> {
    if no_cache {
        tracing::info!("Page cache disabled for this run");
        return Arc::new(MemoryPageStore::new());
    }

    match FsPageStore::open(&config.output.cache_dir) {
        Ok(store) => {
            if fresh {
                match store.clear() {
                    Ok(removed) => tracing::info!("Removed {} cached pages", removed),
                    Err(e) => tracing::warn!("Failed to clear page cache: {}", e),
                }
            }
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("{}; continuing without a persistent cache", e);
            Arc::new(MemoryPageStore::new())
        }
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Catalog-Walker Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Pages per round: {}", config.crawler.batch_size);
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!("  Page parameter: {}", config.crawler.page_param);

    println!("\nSite:");
    println!("  Seed URL: {}", config.site.seed_url);
    println!("  Reserved category: {}", config.site.reserved_category);
    println!("  Category selector: {}", config.site.category_selector);
    println!("  Item selector: {}", config.site.item_selector);

    println!("\nRequest Headers:");
    println!("  User-Agent: {}", config.request.user_agent);
    println!("  Accept: {}", config.request.accept);
    println!("  Accept-Language: {}", config.request.accept_language);
    println!("  Referer: {}", config.request.referer);

    println!("\nOutput:");
    println!("  Cache directory: {}", config.output.cache_dir);
    println!("  Report: {}", config.output.report_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    store: Arc<dyn PageStore>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting crawl");

    let report_path = PathBuf::from(&config.output.report_path);
    let writer = MarkdownReport::new(config.output.report_title.clone());

    let report = match crawl(config, store).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("All categories processed, writing report");
    if let Err(e) = write_report(&writer, &report.categories, &report_path) {
        tracing::error!("Failed to write report: {}", e);
        return Err(e.into());
    }
    tracing::info!("Series by category saved to {}", report_path.display());

    if !quiet {
        println!();
        print_statistics(&report.stats);
    }

    Ok(())
}

fn write_report(
    writer: &dyn ReportWriter,
    categories: &[catalog_walker::Category],
    path: &Path,
) -> catalog_walker::Result<()> {
    writer.write_to(categories, path)?;
    Ok(())
}
