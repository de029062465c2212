//! Crawl statistics
//!
//! This module collects the counters of a finished crawl and prints them
//! as a short human-readable summary.

use crate::crawler::{Category, FetchCounts, WalkSummary};
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the crawl finished
    pub finished_at: DateTime<Utc>,

    /// Number of categories walked
    pub categories: u64,

    /// Unique items across all categories
    pub unique_items: u64,

    /// Items extracted before deduplication
    pub items_seen: u64,

    /// Pagination rounds across all categories
    pub rounds: u64,

    /// Listing pages requested (seed page excluded)
    pub pages_requested: u64,

    /// Listing pages whose fetch failed
    pub pages_failed: u64,

    /// Documents served from the page cache
    pub cache_hits: u64,

    /// Documents requested over the network
    pub network_fetches: u64,

    /// Fetched documents that could not be written to the cache
    pub cache_write_failures: u64,
}

impl CrawlStatistics {
    /// Starts an empty statistics record at `started_at`
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            categories: 0,
            unique_items: 0,
            items_seen: 0,
            rounds: 0,
            pages_requested: 0,
            pages_failed: 0,
            cache_hits: 0,
            network_fetches: 0,
            cache_write_failures: 0,
        }
    }

    /// Adds one category's walk to the totals
    pub fn record_walk(&mut self, category: &Category, walk: &WalkSummary) {
        self.categories += 1;
        self.unique_items += category.records.len() as u64;
        self.items_seen += walk.items_seen;
        self.rounds += u64::from(walk.rounds);
        self.pages_requested += walk.pages_requested;
        self.pages_failed += walk.pages_failed;
    }

    /// Stamps the finish time and copies the fetcher's counters
    pub fn finish(&mut self, counts: FetchCounts, finished_at: DateTime<Utc>) {
        self.cache_hits = counts.cache_hits;
        self.network_fetches = counts.network_fetches;
        self.cache_write_failures = counts.cache_write_failures;
        self.finished_at = finished_at;
    }

    /// Whole seconds between start and finish
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Share of documents served from the cache, in percent
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.network_fetches;
        if total == 0 {
            0.0
        } else {
            (self.cache_hits as f64 / total as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Catalog-Walker Statistics ===\n");

    println!("Started:  {}", stats.started_at.to_rfc3339());
    println!("Finished: {}", stats.finished_at.to_rfc3339());
    println!("Duration: {}s\n", stats.duration_seconds());

    println!("Categories: {}", stats.categories);
    println!(
        "Series: {} unique ({} extracted)",
        stats.unique_items, stats.items_seen
    );
    println!("Rounds: {}", stats.rounds);
    println!(
        "Listing pages: {} requested, {} failed\n",
        stats.pages_requested, stats.pages_failed
    );

    println!(
        "Cache: {} hits, {} network fetches ({:.1}% hit rate)",
        stats.cache_hits,
        stats.network_fetches,
        stats.cache_hit_rate()
    );

    if stats.cache_write_failures > 0 {
        println!(
            "Cache write failures: {} (those pages will be fetched again next run)",
            stats.cache_write_failures
        );
    }
}
