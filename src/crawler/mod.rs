//! Crawler module for catalog discovery
//!
//! This module contains the core crawling logic, including:
//! - Cached fetching with write-through to the page store
//! - HTML extraction of categories and series
//! - Bounded-concurrency page rounds
//! - Per-category pagination with zero-yield termination
//! - Cross-page deduplication and overall crawl coordination

mod aggregator;
mod category;
mod coordinator;
mod extractor;
mod fetcher;
mod scheduler;
mod walker;

pub use aggregator::RecordSet;
pub use category::{Category, CategoryLink, Item};
pub use coordinator::{CrawlOrchestrator, CrawlReport};
pub use extractor::{Extractor, HtmlExtractor};
pub use fetcher::{build_http_client, FetchCounts, FetchError, Fetcher};
pub use scheduler::BatchScheduler;
pub use walker::{PaginationWalker, WalkState, WalkSummary};

use crate::cache::PageStore;
use crate::config::Config;
use crate::WalkerError;
use std::sync::Arc;

/// Runs a complete crawl
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and extractor from the configuration
/// 2. Fetch the seed page and discover categories
/// 3. Walk every category's listing until a round comes back empty
/// 4. Return the deduplicated category tree with statistics
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `store` - The page cache
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed (possibly with failed pages)
/// * `Err(WalkerError)` - The seed page was unreachable or setup failed
pub async fn crawl(config: Config, store: Arc<dyn PageStore>) -> Result<CrawlReport, WalkerError> {
    let orchestrator = CrawlOrchestrator::new(config, store)?;
    orchestrator.run().await
}
