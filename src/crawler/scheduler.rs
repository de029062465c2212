//! Bounded-concurrency batch execution
//!
//! This module runs one pagination round:
//! - Fans out one operation per page URL
//! - Caps the number of operations in flight with a semaphore
//! - Waits for every operation, successful or not
//! - Returns results in input order

use futures::future::join_all;
use std::future::Future;
use tokio::sync::Semaphore;
use url::Url;

/// Runs batches of page operations concurrently under a fixed ceiling
///
/// No operation is cancelled once started, and one operation failing has no
/// effect on its siblings: each result is returned as-is, in the position of
/// the URL that produced it.
pub struct BatchScheduler {
    /// Limits the number of in-flight operations
    semaphore: Semaphore,

    /// Maximum concurrent operations
    ceiling: usize,
}

impl BatchScheduler {
    /// Creates a scheduler allowing at most `ceiling` operations at once
    ///
    /// A ceiling of zero is raised to one.
    pub fn new(ceiling: usize) -> Self {
        let ceiling = ceiling.max(1);
        Self {
            semaphore: Semaphore::new(ceiling),
            ceiling,
        }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Runs `op` once per URL and collects every result
    ///
    /// # Arguments
    ///
    /// * `urls` - Page URLs of the round, in page order
    /// * `op` - The fetch+extract operation for one page
    ///
    /// # Returns
    ///
    /// One result per URL, in the same order as `urls`
    pub async fn run_batch<F, Fut, T, E>(&self, urls: &[Url], op: F) -> Vec<Result<T, E>>
    where
        F: Fn(Url) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let tasks = urls.iter().cloned().map(|url| {
            let operation = op(url);
            async move {
                // Acquire only fails on a closed semaphore; this one is never closed
                let _permit = self.semaphore.acquire().await.ok();
                operation.await
            }
        });

        join_all(tasks).await
    }
}
