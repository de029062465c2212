//! Page store trait and error types
//!
//! This module defines the trait interface for page cache backends and the
//! content-addressed key shared by all of them.

use crate::url::normalize_url;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cache unavailable at {}: {source}", path.display())]
    CacheUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Result type for cache operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Computes the content-addressed key of a URL
///
/// The URL is normalized before hashing, so `.../ai` and `.../ai#ir-list`
/// share one entry. The key is the hex-encoded SHA-256 digest.
///
/// # Example
///
/// ```
/// use catalog_walker::cache::cache_key;
///
/// assert_eq!(
///     cache_key("https://example.com/a#ir-list"),
///     cache_key("https://example.com/a")
/// );
/// assert_eq!(cache_key("https://example.com/a").len(), 64);
/// ```
pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_url(url).as_bytes());
    hex::encode(hasher.finalize())
}

/// Trait for page cache backends
///
/// Implementations map a normalized URL to the raw body fetched for it.
/// `get` never touches the network. `put` overwrites the whole entry, so
/// storing identical content twice is observably a no-op. Implementations
/// must tolerate concurrent reads and concurrent writes to different keys.
pub trait PageStore: Send + Sync {
    /// Returns the cached body for `url`, or None when it was never stored
    fn get(&self, url: &str) -> StoreResult<Option<String>>;

    /// Stores `body` as the cached document for `url`
    fn put(&self, url: &str, body: &str) -> StoreResult<()>;

    /// Returns true if `url` has a cached body
    fn contains(&self, url: &str) -> bool {
        matches!(self.get(url), Ok(Some(_)))
    }
}
