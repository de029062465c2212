//! HTML extraction of catalog records
//!
//! This module turns raw listing documents into typed records:
//! - Category links from the seed page
//! - Series links from a category listing page
//!
//! The crawl engine only sees the `Extractor` trait, so a different site
//! layout only needs a different implementation.

use crate::config::SiteConfig;
use crate::crawler::category::{CategoryLink, Item};
use crate::url::resolve_href;
use crate::{ConfigError, ConfigResult};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Turns a raw document into typed catalog records
///
/// Implementations must be pure: no I/O, and an empty result is a valid
/// answer (a page past the end of a listing has no items).
pub trait Extractor: Send + Sync {
    /// Extracts the categories linked from the seed page
    fn extract_categories(&self, document: &str, base_url: &Url) -> Vec<CategoryLink>;

    /// Extracts the items listed on one listing page
    fn extract_items(&self, document: &str, base_url: &Url) -> Vec<Item>;
}

/// CSS-selector driven extractor
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    category_selector: Selector,
    item_selector: Selector,
}

impl HtmlExtractor {
    /// Builds an extractor from the site's configured selectors
    ///
    /// # Example
    ///
    /// ```
    /// use catalog_walker::config::SiteConfig;
    /// use catalog_walker::crawler::{Extractor, HtmlExtractor};
    /// use url::Url;
    ///
    /// let extractor = HtmlExtractor::new(&SiteConfig::default()).unwrap();
    /// let html = r#"<div class="articles-box"><h3 class="articles-topic">
    ///     <a href="/users/1/ironman/100">Learning Rust</a></h3></div>"#;
    /// let base = Url::parse("https://ithelp.ithome.com.tw/2024ironman/ai").unwrap();
    ///
    /// let items = extractor.extract_items(html, &base);
    /// assert_eq!(items[0].title, "Learning Rust");
    /// assert_eq!(items[0].url, "https://ithelp.ithome.com.tw/users/1/ironman/100");
    /// ```
    pub fn new(site: &SiteConfig) -> ConfigResult<Self> {
        Ok(Self {
            category_selector: parse_selector(&site.category_selector)?,
            item_selector: parse_selector(&site.item_selector)?,
        })
    }
}

fn parse_selector(selector: &str) -> ConfigResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

/// Returns the text and resolved href of a link element
///
/// Whitespace runs in the text collapse to single spaces. None when the text
/// is empty or the href is missing or unusable.
fn link_parts(element: ElementRef<'_>, base_url: &Url) -> Option<(String, String)> {
    let text = element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        return None;
    }

    let href = element.value().attr("href")?;
    let url = resolve_href(href, base_url)?;

    Some((text, url))
}

impl Extractor for HtmlExtractor {
    fn extract_categories(&self, document: &str, base_url: &Url) -> Vec<CategoryLink> {
        let document = Html::parse_document(document);

        document
            .select(&self.category_selector)
            .filter_map(|element| link_parts(element, base_url))
            .map(|(name, url)| CategoryLink { name, url })
            .collect()
    }

    fn extract_items(&self, document: &str, base_url: &Url) -> Vec<Item> {
        let document = Html::parse_document(document);

        document
            .select(&self.item_selector)
            .filter_map(|element| link_parts(element, base_url))
            .map(|(title, url)| Item::new(title, &url))
            .collect()
    }
}
