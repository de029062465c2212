//! Cross-page deduplication of a category's items

use crate::crawler::category::Item;
use std::collections::HashMap;

/// Ordered set of items keyed by normalized URL
///
/// Insertion order of the first occurrence is preserved. When an item is
/// merged again, the stored title is replaced by the newer one but its
/// position is kept.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges items into the set, returning the number newly added
    pub fn merge(&mut self, items: impl IntoIterator<Item = Item>) -> usize {
        let mut added = 0;

        for item in items {
            match self.index.get(&item.url) {
                Some(&position) => {
                    self.items[position].title = item.title;
                }
                None => {
                    self.index.insert(item.url.clone(), self.items.len());
                    self.items.push(item);
                    added += 1;
                }
            }
        }

        added
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Item> {
        self.items
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
