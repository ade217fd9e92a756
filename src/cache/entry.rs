//! Cache Entry Module
//!
//! Versioned, TTL-bounded record shared by both cache tiers. The persistent
//! tier stores it as JSON `{"data": .., "expiresAt": .., "version": ".."}`.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached payload with its absolute expiry and schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Version of the build that wrote the entry
    pub version: String,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry expiring `ttl_ms` milliseconds from now.
    pub fn new(data: T, ttl_ms: u64, version: impl Into<String>) -> Self {
        Self {
            data,
            expires_at: current_timestamp_ms().saturating_add(ttl_ms),
            version: version.into(),
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches `expires_at`.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    // == Is Valid ==
    /// Valid means written by `version` and not yet expired.
    pub fn is_valid(&self, version: &str) -> bool {
        self.version == version && !self.is_expired()
    }

    /// Remaining lifetime in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
