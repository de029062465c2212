use crate::cache::traits::{cache_key, PageStore, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory page store
///
/// Used when caching is disabled for a run and as the substitute store in
/// tests. Entries live only as long as the store.
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-filled with `(url, body)` pairs
    pub fn with_pages<I, U, B>(pages: I) -> Self
    where
        I: IntoIterator<Item = (U, B)>,
        U: AsRef<str>,
        B: Into<String>,
    {
        let entries = pages
            .into_iter()
            .map(|(url, body)| (cache_key(url.as_ref()), body.into()))
            .collect();

        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Number of cached pages
    pub fn len(&self) -> StoreResult<usize> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl PageStore for MemoryPageStore {
    fn get(&self, url: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(&cache_key(url)).cloned())
    }

    fn put(&self, url: &str, body: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.insert(cache_key(url), body.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get() {
        let store = MemoryPageStore::new();
        assert!(store.is_empty().unwrap());

        store.put("https://example.com/a", "a").unwrap();
        assert_eq!(
            store.get("https://example.com/a").unwrap().as_deref(),
            Some("a")
        );
        assert_eq!(store.get("https://example.com/b").unwrap(), None);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = std::sync::Arc::new(MemoryPageStore::new());
        store.put("https://example.com/a", "a").unwrap();

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(StoreError::Poisoned)));
        assert!(matches!(store.is_empty(), Err(StoreError::Poisoned)));
        assert!(matches!(
            store.get("https://example.com/a"),
            Err(StoreError::Poisoned)
        ));
    }

    #[test]
    fn test_keys_are_normalized() {
        let store = MemoryPageStore::with_pages([("https://example.com/a#ir-list", "a")]);
        assert!(store.contains("https://example.com/a"));
    }
}
