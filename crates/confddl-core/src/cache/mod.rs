//! Local caching module for offline data access.
//!
//! `CacheManager` keeps the last good conference list and the user's
//! favorites in a simple key-value `Storage`. Conference writes are staged
//! through temp keys and promoted, and an empty list is never written.

pub mod manager;
pub mod storage;

pub use manager::{CacheManager, CachedData};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
