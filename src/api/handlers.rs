//! API Handlers
//!
//! HTTP request handlers for the cache and recurrence endpoints.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::warn;

use crate::cache::{
    CacheOptions, CacheStrategy, FileStorage, MemoryStorage, StrategyCache, TieredCache,
};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    DeleteResponse, DescribeRequest, GetResponse, HealthResponse, InvalidateRequest,
    RecurrencePayload, RecurrenceResponse, RemovedResponse, SetRequest, SetResponse,
    StatsResponse, StrategyInfo,
};
use crate::recurrence;

/// Application state shared across all handlers.
///
/// The cache is owned here and handed to handlers explicitly; nothing
/// reaches it through a global.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RwLock<StrategyCache>>,
}

impl AppState {
    pub fn new(cache: StrategyCache) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// State backed by a process-local persistent tier.
    pub fn in_memory(options: CacheOptions) -> Self {
        Self::new(StrategyCache::new(TieredCache::new(
            MemoryStorage::new(),
            options,
        )))
    }

    /// Builds the cache described by `config`.
    ///
    /// An unusable storage file degrades to the in-memory backend.
    pub fn from_config(config: &Config) -> Self {
        let options = config.cache_options();
        let tiered = match &config.storage_path {
            Some(path) => match FileStorage::open(path, config.storage_quota_bytes) {
                Ok(storage) => TieredCache::new(storage, options),
                Err(err) => {
                    warn!(
                        "Cannot open cache storage at {:?} ({}), using memory storage",
                        path, err
                    );
                    TieredCache::new(memory_storage(config), options)
                }
            },
            None => TieredCache::new(memory_storage(config), options),
        };
        Self::new(StrategyCache::new(tiered))
    }
}

fn memory_storage(config: &Config) -> MemoryStorage {
    match config.storage_quota_bytes {
        Some(quota) => MemoryStorage::with_quota(quota),
        None => MemoryStorage::new(),
    }
}

fn parse_strategy(name: &str) -> Result<CacheStrategy> {
    name.parse::<CacheStrategy>()
        .map_err(|err| ApiError::UnknownStrategy(err.0))
}

/// Handler for PUT /cache/:strategy/:key
pub async fn set_handler(
    State(state): State<AppState>,
    Path((strategy, key)): Path<(String, String)>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    let strategy = parse_strategy(&strategy)?;
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let ttl_ms = req.ttl_ms.unwrap_or(strategy.policy().ttl_ms);
    let mut cache = state.cache.write().await;
    cache.set(strategy, &key, &req.value, Some(ttl_ms));

    Ok(Json(SetResponse::new(strategy, key, ttl_ms)))
}

/// Handler for GET /cache/:strategy/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path((strategy, key)): Path<(String, String)>,
) -> Result<Json<GetResponse>> {
    let strategy = parse_strategy(&strategy)?;

    // Write lock: reads promote entries and touch recency
    let mut cache = state.cache.write().await;
    let value = cache
        .get::<serde_json::Value>(strategy, &key)
        .ok_or_else(|| ApiError::NotFound(strategy.namespaced(&key)))?;

    Ok(Json(GetResponse::new(strategy, key, value)))
}

/// Handler for DELETE /cache/:strategy/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((strategy, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    let strategy = parse_strategy(&strategy)?;

    let mut cache = state.cache.write().await;
    cache.invalidate(strategy, &key);

    Ok(Json(DeleteResponse::new(strategy.namespaced(&key))))
}

/// Handler for DELETE /cache/:strategy
pub async fn invalidate_strategy_handler(
    State(state): State<AppState>,
    Path(strategy): Path<String>,
) -> Result<Json<RemovedResponse>> {
    let strategy = parse_strategy(&strategy)?;

    let mut cache = state.cache.write().await;
    let removed = cache.invalidate_strategy(strategy);

    Ok(Json(RemovedResponse { removed }))
}

/// Handler for POST /invalidate
pub async fn invalidate_pattern_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<RemovedResponse>> {
    let strategy = parse_strategy(&req.strategy)?;
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    let removed = cache.invalidate_pattern(&req.pattern, strategy);

    Ok(Json(RemovedResponse { removed }))
}

/// Handler for POST /cleanup
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let mut cache = state.cache.write().await;
    Json(RemovedResponse {
        removed: cache.cleanup(),
    })
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<RemovedResponse> {
    let mut cache = state.cache.write().await;
    Json(RemovedResponse {
        removed: cache.clear(),
    })
}

/// Handler for GET /strategies
pub async fn strategies_handler() -> Json<Vec<StrategyInfo>> {
    Json(CacheStrategy::ALL.into_iter().map(StrategyInfo::from).collect())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(cache.stats(), cache.size_bytes()))
}

/// Handler for POST /recurrence/serialize
pub async fn recurrence_serialize_handler(
    Json(payload): Json<RecurrencePayload>,
) -> Result<Json<RecurrenceResponse>> {
    let config = payload.to_config().map_err(ApiError::InvalidRequest)?;
    Ok(Json(RecurrenceResponse::from_config(&config)))
}

/// Handler for POST /recurrence/describe
///
/// Never fails on malformed input; it describes the `none` rule instead.
pub async fn recurrence_describe_handler(
    Json(req): Json<DescribeRequest>,
) -> Json<RecurrenceResponse> {
    let config = recurrence::deserialize(&req.encoded);
    Json(RecurrenceResponse::from_config(&config))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
