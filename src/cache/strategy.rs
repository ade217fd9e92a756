//! Cache Strategies
//!
//! Named TTL policies layered over the tiered cache. Every strategy owns the
//! key namespace `"<strategy>:"` and supplies a default TTL.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::cache::{CacheStats, TieredCache};

const MINUTE_MS: u64 = 60 * 1000;

// == Strategy ==
/// The fixed set of caching policies used by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStrategy {
    /// Athlete profile data
    AthleteProfile,
    /// Frequently repeated list queries
    FrequentQuery,
    /// Dashboard statistics
    Stats,
    /// Short-lived scratch values
    Temporary,
}

/// Policy attached to a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrategyPolicy {
    /// Default time-to-live in milliseconds
    pub ttl_ms: u64,
    /// Declared for profile data; nothing serves stale entries yet
    pub stale_while_revalidate: bool,
}

impl CacheStrategy {
    pub const ALL: [CacheStrategy; 4] = [
        CacheStrategy::AthleteProfile,
        CacheStrategy::FrequentQuery,
        CacheStrategy::Stats,
        CacheStrategy::Temporary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CacheStrategy::AthleteProfile => "athlete-profile",
            CacheStrategy::FrequentQuery => "frequent-query",
            CacheStrategy::Stats => "stats",
            CacheStrategy::Temporary => "temporary",
        }
    }

    pub fn policy(&self) -> StrategyPolicy {
        match self {
            CacheStrategy::AthleteProfile => StrategyPolicy {
                ttl_ms: 30 * MINUTE_MS,
                stale_while_revalidate: true,
            },
            CacheStrategy::FrequentQuery => StrategyPolicy {
                ttl_ms: 5 * MINUTE_MS,
                stale_while_revalidate: false,
            },
            CacheStrategy::Stats => StrategyPolicy {
                ttl_ms: 2 * MINUTE_MS,
                stale_while_revalidate: false,
            },
            CacheStrategy::Temporary => StrategyPolicy {
                ttl_ms: MINUTE_MS,
                stale_while_revalidate: false,
            },
        }
    }

    /// Namespace prefix, e.g. `"stats:"`.
    pub fn prefix(&self) -> String {
        format!("{}:", self.name())
    }

    /// Full cache key for `key` under this strategy.
    pub fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.name(), key)
    }
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown cache strategy '{0}'")]
pub struct ParseStrategyError(pub String);

impl FromStr for CacheStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CacheStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| ParseStrategyError(s.to_string()))
    }
}

// == Strategy Cache ==
/// Tiered cache addressed through strategies.
#[derive(Debug)]
pub struct StrategyCache {
    cache: TieredCache,
}

impl StrategyCache {
    pub fn new(cache: TieredCache) -> Self {
        Self { cache }
    }

    pub fn get<T: DeserializeOwned>(&mut self, strategy: CacheStrategy, key: &str) -> Option<T> {
        self.cache.get(&strategy.namespaced(key))
    }

    /// Stores `data` with the strategy's default TTL unless `ttl_ms` overrides it.
    pub fn set<T: Serialize + ?Sized>(
        &mut self,
        strategy: CacheStrategy,
        key: &str,
        data: &T,
        ttl_ms: Option<u64>,
    ) {
        let ttl_ms = ttl_ms.unwrap_or(strategy.policy().ttl_ms);
        self.cache.set(&strategy.namespaced(key), data, ttl_ms);
    }

    /// Drops a single key.
    pub fn invalidate(&mut self, strategy: CacheStrategy, key: &str) {
        self.cache.delete(&strategy.namespaced(key));
    }

    /// Drops every key under the strategy. Returns the number removed.
    pub fn invalidate_strategy(&mut self, strategy: CacheStrategy) -> usize {
        let removed = self.cache.delete_prefix(&strategy.prefix());
        info!("Invalidated {} entries for strategy {}", removed, strategy);
        removed
    }

    /// Drops every key under the strategy starting with `pattern`, e.g.
    /// `"athlete:123"` for all sections cached for one athlete.
    pub fn invalidate_pattern(&mut self, pattern: &str, strategy: CacheStrategy) -> usize {
        let removed = self.cache.delete_prefix(&strategy.namespaced(pattern));
        info!(
            "Invalidated {} entries matching {} for strategy {}",
            removed, pattern, strategy
        );
        removed
    }

    pub fn cleanup(&mut self) -> usize {
        self.cache.cleanup()
    }

    pub fn clear(&mut self) -> usize {
        self.cache.clear()
    }

    pub fn size_bytes(&self) -> usize {
        self.cache.size_bytes()
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn inner(&self) -> &TieredCache {
        &self.cache
    }
}
