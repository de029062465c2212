use serde::Deserialize;
use std::time::Duration;

/// Default number of pages fetched per round (also the concurrency ceiling)
pub const DEFAULT_BATCH_SIZE: usize = 15;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Main configuration structure for Catalog-Walker
///
/// Every section may be omitted from the TOML file; missing values fall back
/// to the defaults for the iThome Ironman catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pages fetched per pagination round; doubles as the concurrency ceiling
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Timeout applied to every network request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Query parameter carrying the page number
    #[serde(rename = "page-param")]
    pub page_param: String,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            page_param: "page".to_string(),
        }
    }
}

/// The crawled site: where to start and how to read its pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Catalog page listing every category
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Category name that aggregates every other category and is skipped
    #[serde(rename = "reserved-category")]
    pub reserved_category: String,

    /// CSS selector for category links on the seed page
    #[serde(rename = "category-selector")]
    pub category_selector: String,

    /// CSS selector for series links on a listing page
    #[serde(rename = "item-selector")]
    pub item_selector: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            seed_url: "https://ithelp.ithome.com.tw/2024ironman/".to_string(),
            reserved_category: "ALL".to_string(),
            category_selector: ".class-bar-item a".to_string(),
            item_selector: ".articles-box .articles-topic a".to_string(),
        }
    }
}

/// Fixed header set sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub accept: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Optional Referer header; omitted when empty
    pub referer: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
            referer: "https://ithelp.ithome.com.tw/".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding the page cache
    #[serde(rename = "cache-dir")]
    pub cache_dir: String,

    /// Path to the markdown report
    #[serde(rename = "report-path")]
    pub report_path: String,

    /// Top-level heading of the report
    #[serde(rename = "report-title")]
    pub report_title: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            cache_dir: "cache".to_string(),
            report_path: "topics.md".to_string(),
            report_title: "Series by Category - iThome Ironman".to_string(),
        }
    }
}
