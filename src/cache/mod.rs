//! Page cache module
//!
//! This module holds the content-addressed cache that makes fetches
//! idempotent across runs:
//! - The `PageStore` trait and its `cache_key` hashing
//! - A durable directory-backed store
//! - An in-memory store for cache-less runs and tests

mod fs;
mod memory;
mod traits;

pub use fs::FsPageStore;
pub use memory::MemoryPageStore;
pub use traits::{cache_key, PageStore, StoreError, StoreResult};
