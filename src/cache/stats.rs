//! Cache Statistics Module
//!
//! Counters describing how the two tiers are being used.

use serde::Serialize;

// == Cache Stats ==
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads served by the in-memory tier
    pub memory_hits: u64,
    /// Reads served by the persistent tier (and promoted)
    pub persistent_hits: u64,
    /// Reads that found nothing usable
    pub misses: u64,
    /// In-memory entries dropped by the LRU bound
    pub evictions: u64,
    /// Persistent writes skipped because the entry exceeded the size cap
    pub oversized_skips: u64,
    /// Persistent writes that failed and were swallowed
    pub write_failures: u64,
    /// Cleanup passes triggered by a quota-exceeded write
    pub quota_cleanups: u64,
    /// Current number of in-memory entries
    pub memory_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Hits over all reads, or 0.0 before any read.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn hits(&self) -> u64 {
        self.memory_hits + self.persistent_hits
    }

    pub fn record_memory_hit(&mut self) {
        self.memory_hits += 1;
    }

    pub fn record_persistent_hit(&mut self) {
        self.persistent_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_oversized_skip(&mut self) {
        self.oversized_skips += 1;
    }

    pub fn record_write_failure(&mut self) {
        self.write_failures += 1;
    }

    pub fn record_quota_cleanup(&mut self) {
        self.quota_cleanups += 1;
    }

    pub fn set_memory_entries(&mut self, count: usize) {
        self.memory_entries = count;
    }
}
