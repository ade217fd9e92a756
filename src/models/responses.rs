//! Response DTOs for the studio cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, CacheStrategy};
use crate::models::RecurrencePayload;
use crate::recurrence::{self, RecurrenceConfig};

/// Response body for `GET /cache/:strategy/:key`
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub strategy: CacheStrategy,
    pub key: String,
    pub value: serde_json::Value,
}

impl GetResponse {
    pub fn new(strategy: CacheStrategy, key: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            strategy,
            key: key.into(),
            value,
        }
    }
}

/// Response body for `PUT /cache/:strategy/:key`
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub message: String,
    pub key: String,
    /// TTL actually applied
    pub ttl_ms: u64,
}

impl SetResponse {
    pub fn new(strategy: CacheStrategy, key: impl Into<String>, ttl_ms: u64) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' cached under '{}'", key, strategy),
            key,
            ttl_ms,
        }
    }
}

/// Response body for single-key deletes
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' invalidated", key),
            key,
        }
    }
}

/// Response body for bulk removals (strategy, pattern, cleanup, clear)
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    pub removed: usize,
}

/// One row of `GET /strategies`
#[derive(Debug, Clone, Serialize)]
pub struct StrategyInfo {
    pub name: CacheStrategy,
    pub ttl_ms: u64,
    pub stale_while_revalidate: bool,
}

impl From<CacheStrategy> for StrategyInfo {
    fn from(strategy: CacheStrategy) -> Self {
        let policy = strategy.policy();
        Self {
            name: strategy,
            ttl_ms: policy.ttl_ms,
            stale_while_revalidate: policy.stale_while_revalidate,
        }
    }
}

/// Response body for `GET /stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hits over all reads
    pub hit_rate: f64,
    /// Approximate persistent tier footprint
    pub size_bytes: usize,
}

impl StatsResponse {
    pub fn new(stats: CacheStats, size_bytes: usize) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            stats,
            size_bytes,
        }
    }
}

/// Response body for the recurrence endpoints
#[derive(Debug, Clone, Serialize)]
pub struct RecurrenceResponse {
    pub encoded: String,
    pub label: String,
    pub end_label: String,
    pub config: RecurrencePayload,
}

impl RecurrenceResponse {
    pub fn from_config(config: &RecurrenceConfig) -> Self {
        Self {
            encoded: recurrence::serialize(config),
            label: recurrence::describe(config),
            end_label: recurrence::describe_end(config),
            config: RecurrencePayload::from(config),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
