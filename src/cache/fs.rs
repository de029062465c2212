//! Directory-backed page store
//!
//! Each entry is a file named `<cache_key>.html` holding the raw body
//! verbatim. Writes go to a temporary sibling file that is renamed into
//! place, so a reader never observes a half-written entry.

use crate::cache::traits::{cache_key, PageStore, StoreError, StoreResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Extension of cache entry files
const ENTRY_EXTENSION: &str = "html";

/// Durable page store rooted at a directory
#[derive(Debug)]
pub struct FsPageStore {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

impl FsPageStore {
    /// Opens the store, creating the directory if it does not exist
    ///
    /// # Returns
    ///
    /// * `Ok(FsPageStore)` - The directory exists and is usable
    /// * `Err(StoreError::CacheUnavailable)` - The directory could not be created
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::CacheUnavailable {
            path: root.clone(),
            source,
        })?;

        tracing::debug!("Page cache opened at {}", root.display());

        Ok(Self {
            root,
            tmp_counter: AtomicU64::new(0),
        })
    }

    /// Returns the cache directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file that holds (or would hold) the entry for `url`
    pub fn entry_path(&self, url: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", cache_key(url), ENTRY_EXTENSION))
    }

    /// Counts the entries currently on disk
    pub fn len(&self) -> StoreResult<usize> {
        let entries = fs::read_dir(&self.root).map_err(|source| self.unavailable(source))?;

        Ok(entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.path().extension().and_then(|ext| ext.to_str()) == Some(ENTRY_EXTENSION)
            })
            .count())
    }

    /// Returns true when the store holds no entries
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Removes every cache entry, returning how many were deleted
    pub fn clear(&self) -> StoreResult<usize> {
        let entries = fs::read_dir(&self.root).map_err(|source| self.unavailable(source))?;
        let mut removed = 0;

        for entry in entries {
            let path = entry.map_err(|source| self.unavailable(source))?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(ENTRY_EXTENSION) {
                fs::remove_file(&path).map_err(|source| self.unavailable(source))?;
                removed += 1;
            }
        }

        Ok(removed)
    }

    fn unavailable(&self, source: std::io::Error) -> StoreError {
        StoreError::CacheUnavailable {
            path: self.root.clone(),
            source,
        }
    }
}

impl PageStore for FsPageStore {
    fn get(&self, url: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.entry_path(url)) {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.unavailable(e)),
        }
    }

    fn put(&self, url: &str, body: &str) -> StoreResult<()> {
        // Recreate the directory if it was removed while the run was going
        fs::create_dir_all(&self.root).map_err(|source| self.unavailable(source))?;

        let target = self.entry_path(url);
        let tmp = self.root.join(format!(
            "{}.{}.{}.tmp",
            cache_key(url),
            std::process::id(),
            self.tmp_counter.fetch_add(1, Ordering::Relaxed)
        ));

        fs::write(&tmp, body).map_err(|source| self.unavailable(source))?;

        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(self.unavailable(e));
        }

        Ok(())
    }
}
