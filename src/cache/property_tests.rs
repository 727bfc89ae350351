//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache laws over arbitrary keys, values and ages.

use std::sync::Arc;

use proptest::prelude::*;
use tokio_test::block_on;

use crate::cache::{ExpiringCache, ManualClock, MaxAge};
use crate::store::{KeyValueStore, MemoryStore};

// == Test Configuration ==
const T0: u64 = 1_700_000_000_000;

fn create_cache(namespace: &str) -> (ExpiringCache, Arc<MemoryStore>, Arc<ManualClock>) {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(T0));
    let cache = ExpiringCache::with_clock(store.clone(), namespace, clock.clone());
    (cache, store, clock)
}

// == Strategies ==
/// Generates cache key suffixes
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_+]{1,64}"
}

/// Generates JSON-friendly payloads
fn value_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9 ]{0,32}", 0..8)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: Vec<String> },
    Get { key: String },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // put followed by a strict get with any non-negative max age returns the value.
    #[test]
    fn prop_roundtrip(key in key_strategy(), value in value_strategy(), max_age in 0u64..u64::MAX) {
        let (cache, _store, _clock) = create_cache("swgt_cache_");

        let got: Option<Vec<String>> = block_on(async {
            cache.put(&key, &value).await;
            cache.get(&key, MaxAge::Millis(max_age), false).await
        });

        prop_assert_eq!(got, Some(value));
    }

    // A key that was never written is absent in every mode.
    #[test]
    fn prop_unknown_key_is_none(key in key_strategy(), allow_stale in any::<bool>()) {
        let (cache, _store, _clock) = create_cache("swgt_cache_");

        let got: Option<Vec<String>> = block_on(cache.get(&key, MaxAge::Unbounded, allow_stale));
        prop_assert!(got.is_none());
    }

    // Fresh up to and including the TTL, purged one millisecond later.
    #[test]
    fn prop_expiry_boundary(
        key in key_strategy(),
        value in value_strategy(),
        ttl in 0u64..(30 * 24 * 60 * 60 * 1000),
    ) {
        let (cache, _store, clock) = create_cache("");
        block_on(cache.put(&key, &value));

        clock.advance(ttl);
        let at_boundary: Option<Vec<String>> = block_on(cache.get(&key, MaxAge::Millis(ttl), false));
        prop_assert_eq!(at_boundary, Some(value));

        clock.advance(1);
        let expired: Option<Vec<String>> = block_on(cache.get(&key, MaxAge::Millis(ttl), false));
        let again: Option<Vec<String>> = block_on(cache.get(&key, MaxAge::Millis(ttl), false));
        prop_assert!(expired.is_none());
        prop_assert!(again.is_none());
    }

    // Stale reads ignore age entirely and never delete.
    #[test]
    fn prop_stale_read_survives_any_age(
        key in key_strategy(),
        value in value_strategy(),
        ttl in 0u64..1_000_000,
        extra in 1u64..1_000_000_000,
    ) {
        let (cache, store, clock) = create_cache("swgt_cache_");
        block_on(cache.put(&key, &value));

        clock.advance(ttl + extra);
        let stale: Option<Vec<String>> = block_on(cache.get(&key, MaxAge::Millis(ttl), true));
        prop_assert_eq!(stale, Some(value));

        let raw = block_on(store.get_string(&format!("swgt_cache_{}", key))).unwrap();
        prop_assert!(raw.is_some(), "Stale read must not delete the entry");
    }

    // After any op sequence, statistics agree with what the caller observed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let (cache, _store, _clock) = create_cache("swgt_cache_");
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;
        let mut expected_writes: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    block_on(cache.put(&key, &value));
                    expected_writes += 1;
                }
                CacheOp::Get { key } => {
                    let got: Option<Vec<String>> = block_on(cache.get(&key, MaxAge::hours(24), false));
                    match got {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                }
                CacheOp::Remove { key } => block_on(cache.remove(&key)),
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.writes, expected_writes, "Writes mismatch");
    }

    // Prefix eviction removes exactly the matching keys.
    #[test]
    fn prop_remove_by_prefix_is_exact(
        inside in prop::collection::hash_set(key_strategy(), 0..10),
        outside in prop::collection::hash_set(key_strategy(), 0..10),
    ) {
        let (cache, store, _clock) = create_cache("");

        block_on(async {
            for key in &inside {
                cache.put(&format!("swgt_cache_{}", key), &1).await;
            }
            for key in &outside {
                cache.put(&format!("other_{}", key), &2).await;
            }
            cache.remove_by_prefix("swgt_cache_").await;
        });

        let remaining = block_on(store.list_keys()).unwrap();
        prop_assert_eq!(remaining.len(), outside.len());
        prop_assert!(remaining.iter().all(|k| k.starts_with("other_")));
    }
}
