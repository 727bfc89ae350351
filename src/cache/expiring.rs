//! Expiring Cache Module
//!
//! Namespaced, timestamped JSON values on top of a `KeyValueStore`, with strict
//! and stale-tolerant reads. Store failures never reach the caller: reads turn
//! them into misses and writes into no-ops, both logged.

use std::sync::Arc;

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::stats::{CacheStats, StatsRecorder};
use crate::cache::{CacheEntry, MaxAge};
use crate::error::Result;
use crate::store::KeyValueStore;

// == Expiring Cache ==
/// One logical cache region: every key is stored as `namespace + key`.
#[derive(Debug)]
pub struct ExpiringCache {
    /// Shared backing store
    store: Arc<dyn KeyValueStore>,
    /// Prefix prepended to every key of this region
    namespace: String,
    /// Time source for stamping and aging entries
    clock: Arc<dyn Clock>,
    /// Lookup/write/refresh counters
    stats: StatsRecorder,
}

impl ExpiringCache {
    // == Constructors ==
    /// Creates a cache region using the system clock.
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self::with_clock(store, namespace, Arc::new(SystemClock))
    }

    /// Creates a cache region with an explicit clock.
    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        namespace: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            clock,
            stats: StatsRecorder::default(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Current time according to this cache's clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub(super) fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    pub(super) fn recorder(&self) -> &StatsRecorder {
        &self.stats
    }

    // == Put ==
    /// Stores `value` stamped with the current time.
    ///
    /// Failures are logged and counted, never returned.
    pub async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let full_key = self.full_key(key);
        let entry = CacheEntry::new(value, self.clock.now_ms());

        match self.write_entry(&full_key, &entry).await {
            Ok(()) => {
                self.stats.record_write();
                debug!(key = %full_key, "Cache entry stored");
            }
            Err(e) => {
                self.stats.record_write_failure();
                warn!(key = %full_key, error = %e, "Cache write failed, continuing without it");
            }
        }
    }

    async fn write_entry<T: Serialize>(&self, full_key: &str, entry: &CacheEntry<T>) -> Result<()> {
        let json = serde_json::to_string(entry)?;
        self.store.set_string(full_key, &json).await
    }

    // == Get ==
    /// Reads `key`.
    ///
    /// - absent or unreadable: `None`
    /// - `age <= max_age`: the value
    /// - expired, `allow_stale == false`: the entry is deleted and `None` returned
    /// - expired, `allow_stale == true`: the value, entry left in place
    pub async fn get<T: DeserializeOwned>(
        &self,
        key: &str,
        max_age: MaxAge,
        allow_stale: bool,
    ) -> Option<T> {
        let full_key = self.full_key(key);

        let Some(entry) = self.read_entry::<T>(&full_key).await else {
            self.stats.record_miss();
            debug!(key = %full_key, "Cache miss");
            return None;
        };

        let now = self.clock.now_ms();
        if entry.is_fresh(max_age, now) {
            self.stats.record_hit();
            debug!(key = %full_key, age_ms = entry.age_ms(now), "Cache hit");
            return Some(entry.data);
        }

        if allow_stale {
            self.stats.record_stale_hit();
            debug!(key = %full_key, age_ms = entry.age_ms(now), "Serving stale cache entry");
            return Some(entry.data);
        }

        if let Err(e) = self.store.remove_item(&full_key).await {
            warn!(key = %full_key, error = %e, "Failed to purge expired cache entry");
        }
        self.stats.record_expired();
        self.stats.record_miss();
        debug!(key = %full_key, age_ms = entry.age_ms(now), "Cache entry expired and purged");
        None
    }

    /// Age in milliseconds of the entry under `key`, without decoding its data.
    pub async fn age_of(&self, key: &str) -> Option<u64> {
        let full_key = self.full_key(key);
        self.read_entry::<IgnoredAny>(&full_key)
            .await
            .map(|entry| entry.age_ms(self.clock.now_ms()))
    }

    pub(super) async fn read_entry<T: DeserializeOwned>(&self, full_key: &str) -> Option<CacheEntry<T>> {
        let raw = match self.store.get_string(full_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %full_key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(key = %full_key, error = %e, "Unreadable cache entry, treating as miss");
                None
            }
        }
    }

    // == Invalidation ==
    /// Removes a single key.
    pub async fn remove(&self, key: &str) {
        let full_key = self.full_key(key);
        if let Err(e) = self.store.remove_item(&full_key).await {
            warn!(key = %full_key, error = %e, "Failed to remove cache entry");
        }
    }

    /// Removes every key of this region starting with `prefix`, in one batch.
    pub async fn remove_by_prefix(&self, prefix: &str) {
        let full_prefix = self.full_key(prefix);

        let keys = match self.store.list_keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(prefix = %full_prefix, error = %e, "Failed to list keys for eviction");
                return;
            }
        };

        let doomed: Vec<String> = keys
            .into_iter()
            .filter(|key| key.starts_with(&full_prefix))
            .collect();

        if doomed.is_empty() {
            return;
        }

        match self.store.remove_items(&doomed).await {
            Ok(()) => debug!(prefix = %full_prefix, removed = doomed.len(), "Cache entries removed"),
            Err(e) => warn!(prefix = %full_prefix, error = %e, "Failed to remove cache entries"),
        }
    }

    /// Removes the whole region.
    pub async fn clear(&self) {
        self.remove_by_prefix("").await;
    }

    // == Introspection ==
    /// Number of stored keys in this region, fresh or not.
    pub async fn len(&self) -> usize {
        match self.store.list_keys().await {
            Ok(keys) => keys
                .iter()
                .filter(|key| key.starts_with(&self.namespace))
                .count(),
            Err(e) => {
                warn!(namespace = %self.namespace, error = %e, "Failed to list keys");
                0
            }
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::error::CacheError;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    const T0: u64 = 1_700_000_000_000;
    const DAY: u64 = 24 * 60 * 60 * 1000;

    fn create_test_cache(namespace: &str) -> (ExpiringCache, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(T0));
        let cache = ExpiringCache::with_clock(store.clone(), namespace, clock.clone());
        (cache, store, clock)
    }

    /// Store whose every operation fails.
    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get_string(&self, _key: &str) -> Result<Option<String>> {
            Err(CacheError::Storage("disk on fire".into()))
        }
        async fn set_string(&self, _key: &str, _value: &str) -> Result<()> {
            Err(CacheError::Storage("disk on fire".into()))
        }
        async fn remove_item(&self, _key: &str) -> Result<()> {
            Err(CacheError::Storage("disk on fire".into()))
        }
        async fn list_keys(&self) -> Result<Vec<String>> {
            Err(CacheError::Storage("disk on fire".into()))
        }
        async fn remove_items(&self, _keys: &[String]) -> Result<()> {
            Err(CacheError::Storage("disk on fire".into()))
        }
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let (cache, _store, _clock) = create_test_cache("swgt_cache_");

        cache.put("trending_defenses", &vec![1, 2, 3]).await;
        let value: Option<Vec<i32>> = cache.get("trending_defenses", MaxAge::Millis(0), false).await;

        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_get_unknown_key_is_none_in_every_mode() {
        let (cache, _store, _clock) = create_test_cache("swgt_cache_");

        assert!(cache.get::<String>("nope", MaxAge::hours(24), false).await.is_none());
        assert!(cache.get::<String>("nope", MaxAge::Unbounded, true).await.is_none());
        assert_eq!(cache.stats().misses, 2);
    }

    #[tokio::test]
    async fn test_put_writes_namespaced_wire_format() {
        let (cache, store, _clock) = create_test_cache("swgt_cache_");

        cache.put("monsters_sus", &"x").await;

        let raw = store.get_string("swgt_cache_monsters_sus").await.unwrap().unwrap();
        assert_eq!(raw, format!(r#"{{"data":"x","storedAtEpochMillis":{}}}"#, T0));
    }

    #[tokio::test]
    async fn test_expiry_boundary_inclusive() {
        let (cache, _store, clock) = create_test_cache("");
        cache.put("k", &"v").await;

        clock.advance(DAY);
        let at_boundary: Option<String> = cache.get("k", MaxAge::Millis(DAY), false).await;
        assert_eq!(at_boundary.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_strict_get_purges_expired_entry() {
        let (cache, store, clock) = create_test_cache("");
        cache.put("k", &"v").await;

        clock.advance(DAY + 1);
        assert!(cache.get::<String>("k", MaxAge::Millis(DAY), false).await.is_none());
        assert!(store.get_string("k").await.unwrap().is_none(), "Entry should be purged");

        // Even a stale read cannot bring it back
        assert!(cache.get::<String>("k", MaxAge::Millis(DAY), true).await.is_none());
        assert_eq!(cache.stats().expired, 1);
    }

    #[tokio::test]
    async fn test_stale_get_returns_expired_without_deleting() {
        let (cache, store, clock) = create_test_cache("");
        cache.put("k", &"v").await;

        clock.advance(DAY + 1);
        let stale: Option<String> = cache.get("k", MaxAge::Millis(DAY), true).await;
        assert_eq!(stale.as_deref(), Some("v"));
        assert!(store.get_string("k").await.unwrap().is_some());
        assert_eq!(cache.stats().stale_hits, 1);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let (cache, store, _clock) = create_test_cache("ns_");
        store.set_string("ns_bad", "{not json").await.unwrap();
        store
            .set_string("ns_wrong_shape", r#"{"data":"text","storedAtEpochMillis":1}"#)
            .await
            .unwrap();

        assert!(cache.get::<String>("bad", MaxAge::Unbounded, true).await.is_none());
        assert!(cache.get::<u32>("wrong_shape", MaxAge::Unbounded, true).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_by_prefix_keeps_other_keys() {
        let (cache, _store, _clock) = create_test_cache("");
        cache.put("swgt_cache_a", &1).await;
        cache.put("other_b", &2).await;

        cache.remove_by_prefix("swgt_cache_").await;

        assert!(cache.get::<i32>("swgt_cache_a", MaxAge::Unbounded, true).await.is_none());
        assert_eq!(cache.get::<i32>("other_b", MaxAge::Unbounded, false).await, Some(2));
    }

    #[tokio::test]
    async fn test_clear_only_touches_own_namespace() {
        let store = Arc::new(MemoryStore::new());
        let swgt = ExpiringCache::new(store.clone(), "swgt_cache_");
        let notes = ExpiringCache::new(store.clone(), "notification_");
        swgt.put("a", &1).await;
        swgt.put("b", &2).await;
        notes.put("sync_complete", &()).await;

        swgt.clear().await;

        assert!(swgt.is_empty().await);
        assert_eq!(notes.len().await, 1);
    }

    #[tokio::test]
    async fn test_clear_on_empty_store_does_not_panic() {
        let (cache, _store, _clock) = create_test_cache("swgt_cache_");
        cache.clear().await;
        cache.remove("never_written").await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_age_of() {
        let (cache, _store, clock) = create_test_cache("");
        assert!(cache.age_of("k").await.is_none());

        cache.put("k", &vec!["anything"]).await;
        clock.advance(1_234);
        assert_eq!(cache.age_of("k").await, Some(1_234));
    }

    #[tokio::test]
    async fn test_broken_store_never_surfaces_errors() {
        let cache = ExpiringCache::new(Arc::new(BrokenStore), "swgt_cache_");

        cache.put("k", &"v").await;
        assert!(cache.get::<String>("k", MaxAge::Unbounded, true).await.is_none());
        cache.remove("k").await;
        cache.clear().await;
        assert_eq!(cache.len().await, 0);

        let stats = cache.stats();
        assert_eq!(stats.write_failures, 1);
        assert_eq!(stats.writes, 0);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_overwrite_restamps_entry() {
        let (cache, _store, clock) = create_test_cache("");
        cache.put("k", &"first").await;
        clock.advance(DAY);
        cache.put("k", &"second").await;
        clock.advance(10);

        let value: Option<String> = cache.get("k", MaxAge::Millis(100), false).await;
        assert_eq!(value.as_deref(), Some("second"));
    }
}
