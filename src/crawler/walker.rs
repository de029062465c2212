//! Per-category pagination walk
//!
//! A listing has no "last page" marker, so the walker requests pages in
//! rounds of consecutive page numbers and stops after the first round in
//! which no page yielded any item.

use crate::crawler::category::{Category, Item};
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::scheduler::BatchScheduler;
use crate::url::page_url;
use crate::UrlResult;
use url::Url;

/// Lifecycle of a category's pagination walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// More rounds will be requested
    Running,

    /// A round yielded nothing; final
    Exhausted,
}

/// What one category's walk did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub rounds: u32,
    pub pages_requested: u64,
    pub pages_failed: u64,
    /// Items extracted across all pages, duplicates included
    pub items_seen: u64,
}

/// Pagination state machine of one category
#[derive(Debug, Clone)]
pub struct PaginationWalker {
    source_url: String,
    page_param: String,
    batch_size: u32,
    next_page: u32,
    state: WalkState,
    rounds: u32,
}

impl PaginationWalker {
    /// Creates a walker positioned at page 1
    ///
    /// # Arguments
    ///
    /// * `source_url` - The category's listing URL
    /// * `page_param` - Query parameter carrying the page number
    /// * `batch_size` - Pages per round (at least 1)
    pub fn new(source_url: &str, page_param: &str, batch_size: usize) -> Self {
        let batch_size = u32::try_from(batch_size.max(1)).unwrap_or(u32::MAX);

        Self {
            source_url: source_url.to_string(),
            page_param: page_param.to_string(),
            batch_size,
            next_page: 1,
            state: WalkState::Running,
            rounds: 0,
        }
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == WalkState::Exhausted
    }

    /// Page number the next round starts at
    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    /// Rounds completed so far
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Builds the URLs of the next round and advances past them
    ///
    /// The page counter advances by the full batch size whatever the round
    /// later yields. Returns an empty batch once the walker is exhausted.
    pub fn next_batch(&mut self) -> UrlResult<Vec<Url>> {
        if self.is_exhausted() {
            return Ok(Vec::new());
        }

        let first = self.next_page;
        let urls = (0..self.batch_size)
            .map(|offset| page_url(&self.source_url, &self.page_param, first.saturating_add(offset)))
            .collect::<UrlResult<Vec<_>>>()?;

        self.next_page = first.saturating_add(self.batch_size);
        Ok(urls)
    }

    /// Records how many items the last round extracted
    ///
    /// A round with zero items exhausts the walker. That includes a round in
    /// which every page failed to fetch.
    pub fn finish_round(&mut self, items_in_round: usize) -> WalkState {
        if self.is_exhausted() {
            return self.state;
        }

        self.rounds += 1;
        if items_in_round == 0 {
            self.state = WalkState::Exhausted;
        }
        self.state
    }

    /// Walks the category until exhaustion, merging every round's items
    ///
    /// Rounds run strictly one after another; pages within a round run
    /// concurrently through `scheduler`. Page failures count as pages with
    /// no items and never abort the walk.
    pub async fn walk(
        mut self,
        category: &mut Category,
        fetcher: &Fetcher,
        extractor: &dyn Extractor,
        scheduler: &BatchScheduler,
    ) -> WalkSummary {
        let mut summary = WalkSummary::default();

        while !self.is_exhausted() {
            let urls = match self.next_batch() {
                Ok(urls) => urls,
                Err(e) => {
                    tracing::warn!(
                        "Cannot build page URLs for category {} ({}): {}",
                        category.name,
                        self.source_url,
                        e
                    );
                    self.state = WalkState::Exhausted;
                    break;
                }
            };

            let results = scheduler
                .run_batch(&urls, |url| async move {
                    let body = fetcher.fetch(url.as_str()).await?;
                    Ok::<Vec<Item>, FetchError>(extractor.extract_items(&body, &url))
                })
                .await;

            let mut round_items = Vec::new();
            for (url, result) in urls.iter().zip(results) {
                match result {
                    Ok(items) => {
                        tracing::debug!("Extracted {} series from {}", items.len(), url);
                        round_items.extend(items);
                    }
                    Err(e) => {
                        summary.pages_failed += 1;
                        tracing::warn!("Page {} counted as empty: {}", url, e);
                    }
                }
            }

            let items_in_round = round_items.len();
            summary.pages_requested += urls.len() as u64;
            summary.items_seen += items_in_round as u64;
            category.merge(round_items);

            match self.finish_round(items_in_round) {
                WalkState::Running => tracing::info!(
                    "  Processed {} pages. Unique series so far: {}",
                    urls.len(),
                    category.records.len()
                ),
                WalkState::Exhausted => tracing::debug!(
                    "Round {} of {} yielded nothing, listing exhausted",
                    self.rounds,
                    category.name
                ),
            }
        }

        summary.rounds = self.rounds;
        summary
    }
}
