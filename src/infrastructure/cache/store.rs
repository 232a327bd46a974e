//! Two-tier memoization store for parsed completion results.
//!
//! The in-memory tier is authoritative for the life of the process and is
//! never age-checked. The persistent tier keeps one JSON file per key under
//! a configurable directory, with the file's modification time as the
//! staleness clock. Disk failures never surface past this module.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::domain::models::config::CacheConfig;

/// Persistent-tier failures; absorbed at the public surface.
#[derive(Debug, Error)]
enum CacheIoError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Entry counts for the CLI's `cache stats` view.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub disk_entries: usize,
}

/// Two-tier request cache shared by every task in a run.
///
/// Owned by the process root and passed around behind an `Arc`; tests
/// construct isolated instances. The memory tier is guarded by a mutex;
/// the disk tier uses plain file operations with no cross-process locking —
/// concurrent writers to the same key race, last write wins.
#[derive(Debug)]
pub struct RequestCache {
    memory: Mutex<HashMap<String, Value>>,
    dir: Option<PathBuf>,
}

impl RequestCache {
    /// Build a cache from configuration. A disabled persistent tier leaves
    /// the memory tier active on its own.
    pub fn new(config: &CacheConfig) -> Self {
        let dir = if config.disabled {
            None
        } else {
            Some(PathBuf::from(&config.dir))
        };

        if let Some(ref dir) = dir {
            if let Err(err) = fs::create_dir_all(dir) {
                debug!(dir = %dir.display(), error = %err, "cache directory unavailable");
            }
        }

        Self {
            memory: Mutex::new(HashMap::new()),
            dir,
        }
    }

    /// Memory-only cache for ephemeral runs and tests.
    pub fn in_memory() -> Self {
        Self {
            memory: Mutex::new(HashMap::new()),
            dir: None,
        }
    }

    /// Look up a key, honoring `ttl_secs` against the persistent entry's
    /// age. The memory tier is checked first and never age-checked; a disk
    /// hit backfills the memory tier. `ttl_secs <= 0` disables staleness.
    pub fn get(&self, key: &str, ttl_secs: i64) -> Option<Value> {
        if let Some(hit) = self.memory.lock().ok()?.get(key).cloned() {
            return Some(hit);
        }

        match self.read_disk(key, ttl_secs) {
            Ok(Some(value)) => {
                if let Ok(mut memory) = self.memory.lock() {
                    memory.insert(key.to_string(), value.clone());
                }
                Some(value)
            }
            Ok(None) => None,
            Err(err) => {
                debug!(%key, error = %err, "persistent cache read skipped");
                None
            }
        }
    }

    /// Store a payload in both tiers. The disk write is best-effort — an
    /// I/O failure leaves the memory tier authoritative for this process.
    pub fn put(&self, key: &str, payload: &Value) {
        if let Ok(mut memory) = self.memory.lock() {
            memory.insert(key.to_string(), payload.clone());
        }

        if let Err(err) = self.write_disk(key, payload) {
            debug!(%key, error = %err, "persistent cache write skipped");
        }
    }

    /// Drop every entry from both tiers.
    pub fn clear(&self) {
        if let Ok(mut memory) = self.memory.lock() {
            memory.clear();
        }

        if let Err(err) = self.clear_disk() {
            debug!(error = %err, "persistent cache clear incomplete");
        }
    }

    /// Entry counts per tier.
    pub fn stats(&self) -> CacheStats {
        let memory_entries = self.memory.lock().map(|m| m.len()).unwrap_or(0);
        let disk_entries = self.disk_keys().map(|keys| keys.len()).unwrap_or(0);
        CacheStats {
            memory_entries,
            disk_entries,
        }
    }

    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(format!("{key}.json")))
    }

    fn read_disk(&self, key: &str, ttl_secs: i64) -> Result<Option<Value>, CacheIoError> {
        let Some(path) = self.entry_path(key) else {
            return Ok(None);
        };

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        if ttl_secs > 0 {
            // A modification time in the future reads as age zero
            let age = metadata.modified()?.elapsed().unwrap_or_default();
            if age > Duration::from_secs(ttl_secs as u64) {
                return Ok(None);
            }
        }

        let bytes = fs::read(&path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn write_disk(&self, key: &str, payload: &Value) -> Result<(), CacheIoError> {
        let Some(path) = self.entry_path(key) else {
            return Ok(());
        };
        fs::write(path, serde_json::to_vec(payload)?)?;
        Ok(())
    }

    fn clear_disk(&self) -> Result<(), CacheIoError> {
        for key in self.disk_keys().unwrap_or_default() {
            if let Some(path) = self.entry_path(&key) {
                match fs::remove_file(path) {
                    Ok(()) => {}
                    Err(err) if err.kind() == ErrorKind::NotFound => {}
                    Err(err) => return Err(err.into()),
                }
            }
        }
        Ok(())
    }

    fn disk_keys(&self) -> Option<Vec<String>> {
        let dir = self.dir.as_ref()?;
        let entries = fs::read_dir(dir).ok()?;
        let keys = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    path.file_stem()
                        .and_then(|stem| stem.to_str())
                        .map(ToString::to_string)
                } else {
                    None
                }
            })
            .collect();
        Some(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_roundtrip() {
        let cache = RequestCache::in_memory();
        assert!(cache.get("k", 3600).is_none());

        cache.put("k", &json!({"a": 1}));
        assert_eq!(cache.get("k", 3600), Some(json!({"a": 1})));
    }

    #[test]
    fn test_memory_only_cache_has_no_disk_entries() {
        let cache = RequestCache::in_memory();
        cache.put("k", &json!({"a": 1}));

        let stats = cache.stats();
        assert_eq!(stats.memory_entries, 1);
        assert_eq!(stats.disk_entries, 0);
    }

    #[test]
    fn test_disk_roundtrip_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            dir: dir.path().to_string_lossy().into_owned(),
            disabled: false,
            ttl_secs: 3600,
        };

        let first = RequestCache::new(&config);
        first.put("k", &json!({"a": 1}));

        // A fresh instance has an empty memory tier; the hit comes from disk
        let second = RequestCache::new(&config);
        assert_eq!(second.get("k", 3600), Some(json!({"a": 1})));
    }

    #[test]
    fn test_disabled_persistent_tier() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            dir: dir.path().to_string_lossy().into_owned(),
            disabled: true,
            ttl_secs: 3600,
        };

        let first = RequestCache::new(&config);
        first.put("k", &json!({"a": 1}));
        assert_eq!(first.get("k", 3600), Some(json!({"a": 1})));

        let second = RequestCache::new(&config);
        assert!(second.get("k", 3600).is_none());
    }

    #[test]
    fn test_corrupt_disk_entry_reads_as_miss() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            dir: dir.path().to_string_lossy().into_owned(),
            disabled: false,
            ttl_secs: 3600,
        };

        fs::write(dir.path().join("k.json"), b"not json").unwrap();
        let cache = RequestCache::new(&config);
        assert!(cache.get("k", 3600).is_none());
    }

    #[test]
    fn test_clear_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            dir: dir.path().to_string_lossy().into_owned(),
            disabled: false,
            ttl_secs: 3600,
        };

        let cache = RequestCache::new(&config);
        cache.put("k1", &json!({"a": 1}));
        cache.put("k2", &json!({"b": 2}));

        let stats = cache.stats();
        assert_eq!(stats.memory_entries, 2);
        assert_eq!(stats.disk_entries, 2);

        cache.clear();
        let stats = cache.stats();
        assert_eq!(stats.memory_entries, 0);
        assert_eq!(stats.disk_entries, 0);
    }
}
