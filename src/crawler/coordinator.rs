//! Crawl orchestration
//!
//! This module drives a whole crawl:
//! - Fetching the seed page and discovering categories
//! - Walking each category's listing to exhaustion, one category at a time
//! - Assembling the deduplicated category tree and its statistics

use crate::cache::PageStore;
use crate::config::Config;
use crate::crawler::category::Category;
use crate::crawler::extractor::{Extractor, HtmlExtractor};
use crate::crawler::fetcher::{build_http_client, FetchCounts, Fetcher};
use crate::crawler::scheduler::BatchScheduler;
use crate::crawler::walker::{PaginationWalker, WalkSummary};
use crate::output::CrawlStatistics;
use crate::url::normalize_url;
use crate::{UrlError, WalkerError};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Result of a completed crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Categories in seed-page order, each with its deduplicated items
    pub categories: Vec<Category>,

    pub stats: CrawlStatistics,
}

/// Top-level crawl driver
pub struct CrawlOrchestrator {
    config: Config,
    fetcher: Fetcher,
    extractor: Box<dyn Extractor>,
    scheduler: BatchScheduler,
}

impl CrawlOrchestrator {
    /// Creates an orchestrator using the configured CSS selectors
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `store` - Page cache shared by every fetch of the crawl
    pub fn new(config: Config, store: Arc<dyn PageStore>) -> Result<Self, WalkerError> {
        let extractor = HtmlExtractor::new(&config.site)?;
        Self::with_extractor(config, store, Box::new(extractor))
    }

    /// Creates an orchestrator with a custom extractor
    pub fn with_extractor(
        config: Config,
        store: Arc<dyn PageStore>,
        extractor: Box<dyn Extractor>,
    ) -> Result<Self, WalkerError> {
        let client = build_http_client(&config.request, &config.crawler)?;
        let scheduler = BatchScheduler::new(config.crawler.batch_size);

        Ok(Self {
            fetcher: Fetcher::new(client, store),
            extractor,
            scheduler,
            config,
        })
    }

    /// Fetches the seed page and returns its categories
    ///
    /// The reserved category (compared case-insensitively) and categories
    /// with a name already seen are dropped.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Category>)` - Categories in seed-page order, records empty
    /// * `Err(WalkerError::SeedUnreachable)` - The seed page could not be fetched
    pub async fn discover_categories(&self) -> Result<Vec<Category>, WalkerError> {
        let seed = normalize_url(&self.config.site.seed_url);
        let seed_url = Url::parse(&seed).map_err(|e| UrlError::Parse(e.to_string()))?;

        tracing::info!("Visiting seed page: {}", seed);
        let document = self
            .fetcher
            .fetch(&seed)
            .await
            .map_err(|source| WalkerError::SeedUnreachable {
                url: seed.clone(),
                source,
            })?;

        let reserved = self.config.site.reserved_category.trim().to_lowercase();
        let mut seen = HashSet::new();
        let categories: Vec<Category> = self
            .extractor
            .extract_categories(&document, &seed_url)
            .into_iter()
            .filter(|link| {
                if link.name.to_lowercase() == reserved {
                    tracing::debug!("Skipping reserved category {}", link.name);
                    return false;
                }
                if !seen.insert(link.name.clone()) {
                    tracing::debug!("Skipping duplicate category {}", link.name);
                    return false;
                }
                true
            })
            .map(Category::from)
            .collect();

        tracing::info!("Found {} categories", categories.len());
        Ok(categories)
    }

    /// Walks one category's listing to exhaustion
    ///
    /// Never fails: unreachable pages count as empty pages.
    pub async fn walk_category(&self, category: &mut Category) -> WalkSummary {
        let walker = PaginationWalker::new(
            &category.source_url,
            &self.config.crawler.page_param,
            self.config.crawler.batch_size,
        );

        walker
            .walk(
                category,
                &self.fetcher,
                self.extractor.as_ref(),
                &self.scheduler,
            )
            .await
    }

    /// Runs the complete crawl
    ///
    /// Categories are walked sequentially; only pages within one round are
    /// fetched concurrently. The only fatal error is an unreachable seed page.
    pub async fn run(&self) -> Result<CrawlReport, WalkerError> {
        let mut stats = CrawlStatistics::new(Utc::now());

        let mut categories = self.discover_categories().await?;
        let total = categories.len();

        for (index, category) in categories.iter_mut().enumerate() {
            tracing::info!(
                "Extracting series for category: {} ({}/{})",
                category.name,
                index + 1,
                total
            );

            let walk = self.walk_category(category).await;
            stats.record_walk(category, &walk);

            tracing::info!(
                "Finished {}: {} unique series in {} rounds",
                category.name,
                category.records.len(),
                walk.rounds
            );
        }

        stats.finish(self.fetcher.counts(), Utc::now());

        Ok(CrawlReport { categories, stats })
    }

    /// Counters of the underlying fetcher
    pub fn fetch_counts(&self) -> FetchCounts {
        self.fetcher.counts()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
