//! Configuration module for Catalog-Walker
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use catalog_walker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("walker.toml")).unwrap();
//! println!("Pages per round: {}", config.crawler.batch_size);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, RequestConfig, SiteConfig, DEFAULT_BATCH_SIZE,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
