//! URL handling module for Catalog-Walker
//!
//! This module provides URL normalization (the identity and cache key of
//! every page and item) and construction of paginated listing URLs.

mod normalize;
mod pagination;

// Re-export main functions
pub use normalize::{normalize_url, NON_SEMANTIC_FRAGMENTS};
pub use pagination::page_url;

use url::Url;

/// Resolves an href found on `base` into a normalized absolute URL
///
/// Returns None for empty hrefs, fragment-only anchors, `javascript:`,
/// `mailto:`, `tel:` and `data:` links, and anything that does not resolve
/// to HTTP or HTTPS.
pub fn resolve_href(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    Some(normalize_url(absolute.as_str()))
}
