//! Configuration Module
//!
//! Loads service and cache settings from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::{CacheOptions, CACHE_VERSION, DEFAULT_MAX_MEMORY_ENTRIES, MAX_ENTRY_BYTES};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup interval in seconds, 0 disables the task
    pub cleanup_interval: u64,
    /// Version string stamped on every persisted entry
    pub cache_version: String,
    /// Largest serialized entry accepted by the persistent tier
    pub max_entry_bytes: usize,
    /// Upper bound on in-memory tier entries
    pub max_memory_entries: usize,
    /// JSON file backing the persistent tier; in-memory backend when unset
    pub storage_path: Option<PathBuf>,
    /// Byte quota of the persistent backend; unlimited when unset
    pub storage_quota_bytes: Option<usize>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `CACHE_VERSION` - Entry version string (default: crate constant)
    /// - `MAX_ENTRY_BYTES` - Persistent entry size cap (default: 5 MiB)
    /// - `MAX_MEMORY_ENTRIES` - Memory tier capacity (default: 1000)
    /// - `STORAGE_PATH` - Persistent tier file (default: none)
    /// - `STORAGE_QUOTA_BYTES` - Persistent tier quota (default: none)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            cache_version: env::var("CACHE_VERSION")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.cache_version),
            max_entry_bytes: parse_var("MAX_ENTRY_BYTES").unwrap_or(defaults.max_entry_bytes),
            max_memory_entries: parse_var("MAX_MEMORY_ENTRIES")
                .unwrap_or(defaults.max_memory_entries),
            storage_path: env::var("STORAGE_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            storage_quota_bytes: parse_var("STORAGE_QUOTA_BYTES"),
        }
    }

    /// Cache tuning derived from this configuration.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions {
            version: self.cache_version.clone(),
            max_entry_bytes: self.max_entry_bytes,
            max_memory_entries: self.max_memory_entries,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cleanup_interval: 60,
            cache_version: CACHE_VERSION.to_string(),
            max_entry_bytes: MAX_ENTRY_BYTES,
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
            storage_path: None,
            storage_quota_bytes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.cache_version, CACHE_VERSION);
        assert_eq!(config.max_entry_bytes, 5 * 1024 * 1024);
        assert_eq!(config.max_memory_entries, 1000);
        assert!(config.storage_path.is_none());
        assert!(config.storage_quota_bytes.is_none());
    }

    #[test]
    fn test_config_from_env_defaults() {
        for var in [
            "SERVER_PORT",
            "CLEANUP_INTERVAL",
            "CACHE_VERSION",
            "MAX_ENTRY_BYTES",
            "MAX_MEMORY_ENTRIES",
            "STORAGE_PATH",
            "STORAGE_QUOTA_BYTES",
        ] {
            env::remove_var(var);
        }

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.max_memory_entries, 1000);
        assert!(config.storage_path.is_none());
    }

    #[test]
    fn test_cache_options_mirror_config() {
        let config = Config {
            cache_version: "2.0.0".to_string(),
            max_entry_bytes: 128,
            max_memory_entries: 4,
            ..Config::default()
        };

        let options = config.cache_options();
        assert_eq!(options.version, "2.0.0");
        assert_eq!(options.max_entry_bytes, 128);
        assert_eq!(options.max_memory_entries, 4);
    }
}
