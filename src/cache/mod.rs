//! Cache Module
//!
//! Two-tier TTL cache (in-memory + persistent) with versioned entries and
//! named strategies.

mod entry;
pub mod keys;
mod lru;
mod stats;
mod storage;
mod store;
mod strategy;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use storage::{FileStorage, MemoryStorage, PersistentStorage};
pub use store::{TieredCache, STORAGE_PREFIX};
pub use strategy::{CacheStrategy, ParseStrategyError, StrategyCache, StrategyPolicy};

// == Public Constants ==
/// Version stamped on entries written by this build
pub const CACHE_VERSION: &str = "1.0.0";

/// Largest serialized entry written to the persistent tier
pub const MAX_ENTRY_BYTES: usize = 5 * 1024 * 1024; // 5 MiB

/// Default capacity of the in-memory tier
pub const DEFAULT_MAX_MEMORY_ENTRIES: usize = 1000;

// == Cache Options ==
/// Tuning for a `TieredCache`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    /// Entries carrying any other version are treated as absent
    pub version: String,
    /// Persistent writes above this serialized size are skipped
    pub max_entry_bytes: usize,
    /// In-memory tier capacity before LRU eviction
    pub max_memory_entries: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION.to_string(),
            max_entry_bytes: MAX_ENTRY_BYTES,
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
        }
    }
}
