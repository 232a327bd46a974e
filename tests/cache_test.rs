//! Integration tests for the two-tier request cache.

use std::time::Duration;

use serde_json::json;

use dealscope::{CacheConfig, RequestCache};

fn disk_config(dir: &tempfile::TempDir) -> CacheConfig {
    CacheConfig {
        dir: dir.path().to_string_lossy().into_owned(),
        disabled: false,
        ttl_secs: 3600,
    }
}

#[test]
fn persistent_hit_survives_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = disk_config(&dir);

    let first = RequestCache::new(&config);
    first.put("k", &json!({"a": 1}));
    drop(first);

    // Fresh instance simulates a new process: empty memory tier, disk hit
    let second = RequestCache::new(&config);
    assert_eq!(second.get("k", 3600), Some(json!({"a": 1})));
}

/// An entry younger than the TTL is a hit; older than the TTL, a miss.
/// A TTL of zero or below disables staleness entirely.
#[test]
fn ttl_boundary_on_persistent_tier() {
    let dir = tempfile::tempdir().unwrap();
    let config = disk_config(&dir);

    RequestCache::new(&config).put("k", &json!({"a": 1}));
    std::thread::sleep(Duration::from_millis(2100));

    // Aged ~2s: a 10s TTL is a comfortable hit, a 1s TTL a miss
    let fresh = RequestCache::new(&config);
    assert_eq!(fresh.get("k", 10), Some(json!({"a": 1})));

    let fresh = RequestCache::new(&config);
    assert!(fresh.get("k", 1).is_none());

    let fresh = RequestCache::new(&config);
    assert_eq!(fresh.get("k", 0), Some(json!({"a": 1})));

    let fresh = RequestCache::new(&config);
    assert_eq!(fresh.get("k", -1), Some(json!({"a": 1})));
}

/// The memory tier is never age-checked: the same instance keeps serving an
/// entry whose persistent copy has gone stale.
#[test]
fn memory_tier_ignores_ttl() {
    let dir = tempfile::tempdir().unwrap();
    let config = disk_config(&dir);

    let cache = RequestCache::new(&config);
    cache.put("k", &json!({"a": 1}));
    std::thread::sleep(Duration::from_millis(2100));

    assert_eq!(cache.get("k", 1), Some(json!({"a": 1})));
}

/// A persistent hit backfills the memory tier, so deleting the file
/// afterwards does not lose the entry for this process.
#[test]
fn disk_hit_backfills_memory_tier() {
    let dir = tempfile::tempdir().unwrap();
    let config = disk_config(&dir);

    RequestCache::new(&config).put("k", &json!({"a": 1}));

    let cache = RequestCache::new(&config);
    assert_eq!(cache.get("k", 3600), Some(json!({"a": 1})));

    std::fs::remove_file(dir.path().join("k.json")).unwrap();
    assert_eq!(cache.get("k", 3600), Some(json!({"a": 1})));
}

#[test]
fn disabled_persistent_tier_keeps_memory_tier() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = disk_config(&dir);
    config.disabled = true;

    let cache = RequestCache::new(&config);
    cache.put("k", &json!({"a": 1}));
    assert_eq!(cache.get("k", 3600), Some(json!({"a": 1})));

    // Nothing reached the disk
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(RequestCache::new(&config).get("k", 3600).is_none());
}

/// Last write wins when two instances race on the same key.
#[test]
fn concurrent_writers_last_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    let config = disk_config(&dir);

    let writer_a = RequestCache::new(&config);
    let writer_b = RequestCache::new(&config);
    writer_a.put("k", &json!({"writer": "a"}));
    writer_b.put("k", &json!({"writer": "b"}));

    let reader = RequestCache::new(&config);
    assert_eq!(reader.get("k", 3600), Some(json!({"writer": "b"})));
}

/// An unwritable cache directory degrades to memory-only instead of failing.
#[test]
fn unwritable_directory_is_absorbed() {
    let config = CacheConfig {
        dir: "/proc/definitely-not-writable/cache".to_string(),
        disabled: false,
        ttl_secs: 3600,
    };

    let cache = RequestCache::new(&config);
    cache.put("k", &json!({"a": 1}));
    assert_eq!(cache.get("k", 3600), Some(json!({"a": 1})));
}
