//! Cache Cleanup Task
//!
//! Background task that periodically evicts expired and stale cache entries
//! from both tiers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::StrategyCache;

/// Spawns a task that calls `cleanup()` on the shared cache every
/// `cleanup_interval_secs` seconds.
///
/// Returns the task handle so the caller can abort it on shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_cleanup_task(state.cache.clone(), 60);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task(
    cache: Arc<RwLock<StrategyCache>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup()
            };

            if removed > 0 {
                info!("Cache cleanup: removed {} stale entries", removed);
            } else {
                debug!("Cache cleanup: no stale entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheOptions, CacheStrategy, MemoryStorage, PersistentStorage, TieredCache};

    fn shared_cache(storage: MemoryStorage) -> Arc<RwLock<StrategyCache>> {
        Arc::new(RwLock::new(StrategyCache::new(TieredCache::new(
            storage,
            CacheOptions::default(),
        ))))
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let storage = MemoryStorage::new();
        let cache = shared_cache(storage.clone());

        {
            let mut guard = cache.write().await;
            guard.set(CacheStrategy::Temporary, "otp", &"123456", Some(200));
        }

        let handle = spawn_cleanup_task(cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(storage.get_item("cache_temporary:otp").unwrap(), None);
        assert_eq!(cache.read().await.inner().memory_len(), 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = shared_cache(MemoryStorage::new());

        {
            let mut guard = cache.write().await;
            guard.set(CacheStrategy::AthleteProfile, "athlete:1:profile", &"Giulia", None);
        }

        let handle = spawn_cleanup_task(cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let mut guard = cache.write().await;
            let value = guard.get::<String>(CacheStrategy::AthleteProfile, "athlete:1:profile");
            assert_eq!(value, Some("Giulia".to_string()), "Valid entry should not be removed");
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let cache = shared_cache(MemoryStorage::new());

        let handle = spawn_cleanup_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
