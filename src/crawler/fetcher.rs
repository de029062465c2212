//! Cached HTTP fetcher
//!
//! This module handles every document retrieval of a crawl:
//! - Building the HTTP client with the fixed identifying header set
//! - Serving pages from the page cache when present
//! - Single-attempt GET requests on a cache miss
//! - Writing fetched bodies through to the cache
//! - Error classification

use crate::cache::PageStore;
use crate::config::{CrawlerConfig, RequestConfig};
use crate::url::normalize_url;
use crate::{ConfigError, WalkerError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Why a page could not be fetched
///
/// The walker treats every variant as a page that yielded zero items.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {error}")]
    Connect { url: String, error: String },

    #[error("Failed to read body of {url}: {error}")]
    Body { url: String, error: String },

    #[error("Request to {url} failed: {error}")]
    Request { url: String, error: String },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. }
            | Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Body { url, .. }
            | Self::Request { url, .. } => url,
        }
    }

    fn classify(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                error: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::Status {
                url,
                status: status.as_u16(),
            }
        } else {
            Self::Request {
                url,
                error: error.to_string(),
            }
        }
    }
}

/// Counters describing where the fetcher's documents came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchCounts {
    pub cache_hits: u64,
    pub network_fetches: u64,
    pub failures: u64,
    pub cache_write_failures: u64,
}

#[derive(Debug, Default)]
struct FetchCounters {
    cache_hits: AtomicU64,
    network_fetches: AtomicU64,
    failures: AtomicU64,
    cache_write_failures: AtomicU64,
}

/// Builds an HTTP client that sends the configured header set
///
/// # Arguments
///
/// * `request` - The identifying headers
/// * `crawler` - Supplies the per-request timeout
///
/// # Example
///
/// ```no_run
/// use catalog_walker::config::Config;
/// use catalog_walker::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.request, &config.crawler).unwrap();
/// ```
pub fn build_http_client(
    request: &RequestConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, WalkerError> {
    let mut headers = HeaderMap::new();
    insert_header(&mut headers, ACCEPT, &request.accept)?;
    insert_header(&mut headers, ACCEPT_LANGUAGE, &request.accept_language)?;
    insert_header(&mut headers, REFERER, &request.referer)?;

    let client = Client::builder()
        .user_agent(request.user_agent.as_str())
        .default_headers(headers)
        .timeout(crawler.request_timeout())
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Adds a header unless its configured value is empty
fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Ok(());
    }

    let value = HeaderValue::from_str(value)
        .map_err(|e| ConfigError::Validation(format!("Invalid {} header: {}", name.as_str(), e)))?;
    headers.insert(name, value);
    Ok(())
}

/// Fetches documents through the page cache
///
/// A cache hit returns without suspending. On a miss the page is requested
/// exactly once; a successful body is written to the cache before it is
/// returned. Cache read failures fall through to the network and cache
/// write failures are logged, neither is surfaced to the caller.
pub struct Fetcher {
    client: Client,
    store: Arc<dyn PageStore>,
    counters: FetchCounters,
}

impl Fetcher {
    pub fn new(client: Client, store: Arc<dyn PageStore>) -> Self {
        Self {
            client,
            store,
            counters: FetchCounters::default(),
        }
    }

    /// Returns the document at `url`, from the cache when possible
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let url = normalize_url(url);

        match self.store.get(&url) {
            Ok(Some(body)) => {
                tracing::debug!("Loaded from cache: {}", url);
                self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
                return Ok(body);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Cache read failed for {}, fetching instead: {}", url, e);
            }
        }

        let body = match self.fetch_network(&url).await {
            Ok(body) => body,
            Err(e) => {
                self.counters.failures.fetch_add(1, Ordering::Relaxed);
                return Err(e);
            }
        };

        if let Err(e) = self.store.put(&url, &body) {
            self.counters
                .cache_write_failures
                .fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Failed to cache {}: {}", url, e);
        }

        Ok(body)
    }

    /// Issues a single GET request for `url`
    async fn fetch_network(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("Fetching: {}", url);
        self.counters.network_fetches.fetch_add(1, Ordering::Relaxed);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            error: e.to_string(),
        })
    }

    /// Snapshot of the fetch counters
    pub fn counts(&self) -> FetchCounts {
        FetchCounts {
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
            network_fetches: self.counters.network_fetches.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
            cache_write_failures: self.counters.cache_write_failures.load(Ordering::Relaxed),
        }
    }
}
