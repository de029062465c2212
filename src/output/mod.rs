//! Output module for crawl reports
//!
//! This module handles:
//! - Rendering the category tree as a markdown report
//! - Collecting and printing crawl statistics

mod markdown;
pub mod stats;
mod traits;

pub use markdown::{format_markdown_report, MarkdownReport};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, ReportWriter};
