//! LRU Tracker Module
//!
//! Recency ordering for the bounded in-memory tier.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Orders keys by last access using a monotonically increasing tick.
///
/// `by_tick` is kept in sync with `by_key`; the smallest tick is the least
/// recently used key.
#[derive(Debug, Default)]
pub struct LruTracker {
    next_tick: u64,
    by_key: HashMap<String, u64>,
    by_tick: BTreeMap<u64, String>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        let tick = self.next_tick;
        self.next_tick += 1;

        if let Some(old) = self.by_key.insert(key.to_string(), tick) {
            self.by_tick.remove(&old);
        }
        self.by_tick.insert(tick, key.to_string());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.by_key.remove(key) {
            self.by_tick.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_tick.pop_first()?;
        self.by_key.remove(&key);
        Some(key)
    }

    pub fn clear(&mut self) {
        self.by_key.clear();
        self.by_tick.clear();
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_new() {
        let mut lru = LruTracker::new();
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_touch_orders_by_insertion() {
        let mut lru = LruTracker::new();
        lru.touch("athlete:1");
        lru.touch("athlete:2");
        lru.touch("athlete:3");

        assert_eq!(lru.evict_oldest(), Some("athlete:1".to_string()));
        assert_eq!(lru.evict_oldest(), Some("athlete:2".to_string()));
    }

    #[test]
    fn test_retouch_moves_key_to_newest() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");
        lru.touch("c");
        lru.touch("a");

        assert_eq!(lru.evict_oldest(), Some("b".to_string()));
        assert_eq!(lru.evict_oldest(), Some("c".to_string()));
        assert_eq!(lru.evict_oldest(), Some("a".to_string()));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");

        lru.remove("a");
        lru.remove("missing");
        lru.touch("c");
        assert_eq!(lru.evict_oldest(), Some("b".to_string()));

        lru.clear();
        assert_eq!(lru.evict_oldest(), None);
    }
}
