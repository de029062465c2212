//! Category tree data model

use crate::crawler::aggregator::RecordSet;
use crate::url::normalize_url;

/// A leaf entry of the catalog (one series)
///
/// Two items are the same entity when their normalized URLs are equal; the
/// title is not part of the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub url: String,
}

impl Item {
    /// Creates an item, normalizing its URL
    pub fn new(title: impl Into<String>, url: &str) -> Self {
        Self {
            title: title.into(),
            url: normalize_url(url),
        }
    }
}

/// A category link found on the seed page, before its listing is walked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLink {
    pub name: String,
    pub url: String,
}

/// A top-level grouping of the catalog and the items found under it
#[derive(Debug, Clone)]
pub struct Category {
    /// Display name, unique within one crawl
    pub name: String,

    /// Normalized listing URL; page URLs are derived from it
    pub source_url: String,

    /// Deduplicated items in first-seen order
    pub records: RecordSet,
}

impl Category {
    pub fn new(name: impl Into<String>, source_url: &str) -> Self {
        Self {
            name: name.into(),
            source_url: normalize_url(source_url),
            records: RecordSet::new(),
        }
    }

    /// Merges a round's items into this category's records
    ///
    /// Returns how many items were not already present.
    pub fn merge(&mut self, items: impl IntoIterator<Item = Item>) -> usize {
        self.records.merge(items)
    }

    /// Items in first-seen order
    pub fn items(&self) -> &[Item] {
        self.records.as_slice()
    }
}

impl From<CategoryLink> for Category {
    fn from(link: CategoryLink) -> Self {
        Category::new(link.name, &link.url)
    }
}
