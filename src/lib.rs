//! Catalog-Walker: a cached, paginated catalog crawler
//!
//! This crate discovers the categories listed on a seed page, walks every
//! category's paginated listing in bounded-concurrency rounds until a round
//! comes back empty, and merges the series found into a deduplicated
//! category tree. Every fetched page is kept in a content-addressed cache so
//! repeated runs are cheap and idempotent.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Catalog-Walker operations
#[derive(Debug, Error)]
pub enum WalkerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Seed page {url} is unreachable: {source}")]
    SeedUnreachable {
        url: String,
        source: crawler::FetchError,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector in config: {0}")]
    InvalidSelector(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for Catalog-Walker operations
pub type Result<T> = std::result::Result<T, WalkerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use cache::{FsPageStore, MemoryPageStore, PageStore};
pub use config::Config;
pub use crawler::{Category, CrawlOrchestrator, Item};
pub use crate::url::{normalize_url, page_url};
