//! Tiered Cache Store
//!
//! Two-tier cache: a bounded in-memory map in front of a persistent
//! key-value backend. No operation returns an error; every storage failure
//! degrades to a miss or a logged, swallowed write failure.

use std::collections::{BTreeSet, HashMap};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheOptions, CacheStats, LruTracker, PersistentStorage};

/// Prefix of every key this cache owns in the persistent backend.
pub const STORAGE_PREFIX: &str = "cache_";

fn storage_key(key: &str) -> String {
    format!("{}{}", STORAGE_PREFIX, key)
}

// == Tiered Cache ==
#[derive(Debug)]
pub struct TieredCache {
    /// In-memory tier
    memory: HashMap<String, CacheEntry<Value>>,
    /// Recency of in-memory keys
    lru: LruTracker,
    /// Persistent tier
    storage: Box<dyn PersistentStorage>,
    stats: CacheStats,
    options: CacheOptions,
}

impl TieredCache {
    // == Constructor ==
    /// Creates a cache over `storage` and immediately runs one cleanup pass.
    pub fn new<S: PersistentStorage + 'static>(storage: S, options: CacheOptions) -> Self {
        let mut cache = Self {
            memory: HashMap::new(),
            lru: LruTracker::new(),
            storage: Box::new(storage),
            stats: CacheStats::new(),
            options,
        };

        let removed = cache.cleanup();
        if removed > 0 {
            info!("Initial cache cleanup removed {} stale entries", removed);
        }
        cache
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    // == Get ==
    /// Looks up `key`, memory first, then the persistent tier.
    ///
    /// A valid persistent entry is promoted into memory. Stale, expired or
    /// unreadable persistent entries are deleted. A payload that does not
    /// decode as `T` counts as a miss.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        if let Some(data) = self.memory_get(key) {
            return match serde_json::from_value(data) {
                Ok(value) => {
                    self.stats.record_memory_hit();
                    Some(value)
                }
                Err(err) => {
                    debug!("Cached value for {} has unexpected shape: {}", key, err);
                    self.stats.record_miss();
                    None
                }
            };
        }

        let Some(entry) = self.persistent_get(key) else {
            self.stats.record_miss();
            return None;
        };

        match serde_json::from_value::<T>(entry.data.clone()) {
            Ok(value) => {
                self.memory_insert(key, entry);
                self.stats.record_persistent_hit();
                Some(value)
            }
            Err(err) => {
                debug!("Persisted value for {} has unexpected shape: {}", key, err);
                self.stats.record_miss();
                None
            }
        }
    }

    fn memory_get(&mut self, key: &str) -> Option<Value> {
        let entry = self.memory.get(key)?;
        if entry.is_valid(&self.options.version) {
            let data = entry.data.clone();
            self.lru.touch(key);
            return Some(data);
        }

        self.memory_remove(key);
        None
    }

    fn persistent_get(&mut self, key: &str) -> Option<CacheEntry<Value>> {
        let skey = storage_key(key);
        let raw = match self.storage.get_item(&skey) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                debug!("Persistent read of {} failed: {}", key, err);
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry<Value>>(&raw) {
            Ok(entry) if entry.is_valid(&self.options.version) => Some(entry),
            Ok(_) => {
                debug!("Dropping stale persistent entry {}", key);
                self.storage_remove(&skey);
                None
            }
            Err(err) => {
                debug!("Dropping unreadable persistent entry {}: {}", key, err);
                self.storage_remove(&skey);
                None
            }
        }
    }

    // == Set ==
    /// Stores `data` under `key` for `ttl_ms` milliseconds.
    ///
    /// The in-memory write always happens. The persistent write is skipped
    /// for entries above the size cap, and a quota-exceeded write triggers
    /// one cleanup pass and one retry.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, data: &T, ttl_ms: u64) {
        let value = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(err) => {
                warn!("Cannot cache {}: payload is not serializable: {}", key, err);
                return;
            }
        };

        let entry = CacheEntry::new(value, ttl_ms, self.options.version.clone());
        let serialized = match serde_json::to_string(&entry) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!("Cannot encode cache entry {}: {}", key, err);
                self.memory_insert(key, entry);
                return;
            }
        };
        self.memory_insert(key, entry);

        if serialized.len() > self.options.max_entry_bytes {
            warn!(
                "Cache entry {} is {} bytes, above the {} byte limit; kept in memory only",
                key,
                serialized.len(),
                self.options.max_entry_bytes
            );
            self.stats.record_oversized_skip();
            return;
        }

        self.persistent_set(key, &serialized);
    }

    fn persistent_set(&mut self, key: &str, serialized: &str) {
        let skey = storage_key(key);
        let err = match self.storage.set_item(&skey, serialized) {
            Ok(()) => return,
            Err(err) => err,
        };

        if !err.is_quota_exceeded() {
            warn!("Persistent write of {} failed: {}", key, err);
            self.stats.record_write_failure();
            return;
        }

        warn!("Storage quota exceeded writing {}, cleaning up and retrying", key);
        self.stats.record_quota_cleanup();
        self.cleanup();

        if let Err(err) = self.storage.set_item(&skey, serialized) {
            warn!("Persistent write of {} failed after cleanup: {}", key, err);
            self.stats.record_write_failure();
        }
    }

    // == Delete ==
    /// Removes `key` from both tiers. Idempotent.
    pub fn delete(&mut self, key: &str) {
        self.memory_remove(key);
        self.storage_remove(&storage_key(key));
    }

    /// Removes every entry whose logical key starts with `prefix`, in both
    /// tiers. Returns the number of distinct keys removed.
    pub fn delete_prefix(&mut self, prefix: &str) -> usize {
        let mut removed: BTreeSet<String> = self
            .memory
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        for key in &removed {
            self.memory_remove(key);
        }

        for skey in self.owned_storage_keys() {
            let logical = &skey[STORAGE_PREFIX.len()..];
            if logical.starts_with(prefix) {
                self.storage_remove(&skey);
                removed.insert(logical.to_string());
            }
        }

        debug!("Removed {} cache entries with prefix {}", removed.len(), prefix);
        removed.len()
    }

    // == Cleanup ==
    /// Evicts expired, version-mismatched and unreadable entries from both
    /// tiers. Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let version = self.options.version.clone();

        let stale: Vec<String> = self
            .memory
            .iter()
            .filter(|(_, entry)| !entry.is_valid(&version))
            .map(|(key, _)| key.clone())
            .collect();
        let mut count = stale.len();
        for key in stale {
            self.memory_remove(&key);
        }

        for skey in self.owned_storage_keys() {
            let keep = match self.storage.get_item(&skey) {
                Ok(Some(raw)) => serde_json::from_str::<CacheEntry<Value>>(&raw)
                    .map(|entry| entry.is_valid(&version))
                    .unwrap_or(false),
                Ok(None) => true,
                Err(err) => {
                    debug!("Skipping {} during cleanup: {}", skey, err);
                    true
                }
            };
            if !keep {
                self.storage_remove(&skey);
                count += 1;
            }
        }

        if count > 0 {
            debug!("Cache cleanup removed {} entries", count);
        }
        count
    }

    // == Clear ==
    /// Empties both tiers. Foreign keys in the backend are left alone.
    /// Returns the number of distinct keys removed.
    pub fn clear(&mut self) -> usize {
        let mut removed: BTreeSet<String> = self.memory.drain().map(|(key, _)| key).collect();
        self.lru.clear();
        self.stats.set_memory_entries(0);
        for skey in self.owned_storage_keys() {
            self.storage_remove(&skey);
            removed.insert(skey[STORAGE_PREFIX.len()..].to_string());
        }
        removed.len()
    }

    // == Size ==
    /// Approximate bytes used by this cache in the persistent tier.
    pub fn size_bytes(&self) -> usize {
        self.owned_storage_keys()
            .into_iter()
            .filter_map(|skey| match self.storage.get_item(&skey) {
                Ok(Some(raw)) => Some(skey.len() + raw.len()),
                _ => None,
            })
            .sum()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_memory_entries(self.memory.len());
        stats
    }

    /// Number of entries in the in-memory tier.
    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    /// True when `key` currently sits in the in-memory tier.
    pub fn in_memory(&self, key: &str) -> bool {
        self.memory.contains_key(key)
    }

    // == Internals ==
    fn memory_insert(&mut self, key: &str, entry: CacheEntry<Value>) {
        let capacity = self.options.max_memory_entries.max(1);
        if !self.memory.contains_key(key) {
            while self.memory.len() >= capacity {
                let Some(oldest) = self.lru.evict_oldest() else {
                    break;
                };
                self.memory.remove(&oldest);
                self.stats.record_eviction();
            }
        }

        self.memory.insert(key.to_string(), entry);
        self.lru.touch(key);
        self.stats.set_memory_entries(self.memory.len());
    }

    fn memory_remove(&mut self, key: &str) {
        if self.memory.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.set_memory_entries(self.memory.len());
        }
    }

    fn storage_remove(&self, skey: &str) {
        if let Err(err) = self.storage.remove_item(skey) {
            warn!("Persistent delete of {} failed: {}", skey, err);
        }
    }

    fn owned_storage_keys(&self) -> Vec<String> {
        match self.storage.keys() {
            Ok(keys) => keys
                .into_iter()
                .filter(|k| k.starts_with(STORAGE_PREFIX))
                .collect(),
            Err(err) => {
                warn!("Listing persistent keys failed: {}", err);
                Vec::new()
            }
        }
    }
}
