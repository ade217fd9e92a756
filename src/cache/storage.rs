//! Persistent Storage Module
//!
//! Synchronous string key-value stores backing the persistent cache tier.
//! Handles are cheap to clone and share one key space, so several caches
//! (or processes, for the file backend) can see the same entries with
//! last-write-wins semantics.

use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::error::StorageError;

// == Storage Trait ==
/// Minimal key-value contract of the persistent tier.
pub trait PersistentStorage: Send + Sync + Debug {
    /// Reads a raw value.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes a raw value, failing with `QuotaExceeded` when it does not fit.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a value. Missing keys are not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Lists every stored key.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|_| StorageError::AccessDenied("storage lock poisoned".to_string()))
}

fn used_bytes(items: &HashMap<String, String>) -> usize {
    items.iter().map(|(k, v)| k.len() + v.len()).sum()
}

/// Rejects a write that would push the store past `quota`.
fn check_quota(
    items: &HashMap<String, String>,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> Result<(), StorageError> {
    let Some(quota) = quota else {
        return Ok(());
    };

    let replaced = items.get(key).map(|old| key.len() + old.len()).unwrap_or(0);
    let needed = used_bytes(items) - replaced + key.len() + value.len();
    if needed > quota {
        return Err(StorageError::QuotaExceeded(format!(
            "{} bytes needed, quota is {} bytes",
            needed, quota
        )));
    }
    Ok(())
}

// == Memory Storage ==
/// Process-local backend with an optional byte quota.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that refuses writes beyond `quota` bytes
    /// (sum of key and value lengths).
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: Arc::default(),
            quota: Some(quota),
        }
    }
}

impl PersistentStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.items)?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = lock(&self.items)?;
        check_quota(&items, key, value, self.quota)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.items)?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(lock(&self.items)?.keys().cloned().collect())
    }
}

// == File Storage ==
/// Backend persisted as a single JSON object on disk; survives restarts.
///
/// Every operation re-reads the file under the handle's lock before acting, so
/// handles opened on the same path (in this or another process) see each
/// other's writes. Mutations rewrite the whole map through a temporary file
/// and a rename; concurrent writers to the same key resolve last-write-wins.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    items: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl FileStorage {
    /// Opens (or lazily creates) the store at `path`.
    pub fn open(path: impl AsRef<Path>, quota: Option<usize>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let items = load(&path)?;

        debug!("Opened file storage at {:?} with {} items", path, items.len());

        Ok(Self {
            path,
            items: Arc::new(Mutex::new(items)),
            quota,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Locks the handle and replaces its map with the file's current content.
    fn refreshed(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        let mut items = lock(&self.items)?;
        *items = load(&self.path)?;
        Ok(items)
    }

    fn persist(&self, items: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(items)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Reads the whole map; a missing or blank file is an empty store.
fn load(path: &Path) -> Result<HashMap<String, String>, StorageError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(HashMap::new());
    }
    Ok(serde_json::from_str(&raw)?)
}

impl PersistentStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.refreshed()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.refreshed()?;
        check_quota(&items, key, value, self.quota)?;

        let previous = items.insert(key.to_string(), value.to_string());
        if let Err(err) = self.persist(&items) {
            match previous {
                Some(old) => items.insert(key.to_string(), old),
                None => items.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.refreshed()?;
        let Some(previous) = items.remove(key) else {
            return Ok(());
        };
        if let Err(err) = self.persist(&items) {
            items.insert(key.to_string(), previous);
            return Err(err);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.refreshed()?.keys().cloned().collect())
    }
}
