//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a plain HashMap model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::TtlCache;

// == Test Configuration ==
const LONG_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates keys from a small alphabet so operations overlap
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Without expiry in play, the cache behaves like a HashMap.
    #[test]
    fn prop_matches_map_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let cache = TtlCache::new(LONG_TTL).unwrap();
        let mut model: HashMap<String, String> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value.clone());
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key), model.get(&key).cloned());
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(cache.delete(&key), model.remove(&key).is_some());
                }
            }
        }

        prop_assert_eq!(cache.len(), model.len());
    }

    // Keys that were never set are never found.
    #[test]
    fn prop_never_set_not_found(
        set_keys in prop::collection::hash_set("[a-m]{1,8}", 0..20),
        probe in "[n-z]{1,8}"
    ) {
        let cache = TtlCache::new(LONG_TTL).unwrap();
        for key in set_keys {
            cache.set(key, 1u32);
        }

        prop_assert_eq!(cache.get(&probe), None);
    }

    // Immediately after set, get returns the value just written.
    #[test]
    fn prop_set_then_get(key in key_strategy(), v1 in value_strategy(), v2 in value_strategy()) {
        let cache = TtlCache::new(LONG_TTL).unwrap();

        cache.set(key.clone(), v1);
        cache.set(key.clone(), v2.clone());

        prop_assert_eq!(cache.get(&key), Some(v2));
        prop_assert_eq!(cache.len(), 1);
    }

    // active + expired == total, for any population.
    #[test]
    fn prop_stats_partition(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let cache = TtlCache::new(LONG_TTL).unwrap();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::Get { key } => { cache.get(&key); }
                CacheOp::Delete { key } => { cache.delete(&key); }
            }
            let stats = cache.stats();
            prop_assert_eq!(stats.active + stats.expired, stats.total);
            prop_assert_eq!(stats.total, cache.len());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // After the TTL elapses every entry is invisible and the sweep removes all.
    #[test]
    fn prop_expired_entries_invisible_and_swept(
        keys in prop::collection::hash_set(key_strategy(), 1..10)
    ) {
        let cache = TtlCache::new(Duration::from_millis(20)).unwrap();
        for key in &keys {
            cache.set(key.clone(), key.len());
        }

        sleep(Duration::from_millis(40));

        for key in &keys {
            prop_assert_eq!(cache.get(key), None);
        }
        let stats = cache.stats();
        prop_assert_eq!(stats.expired, keys.len());
        prop_assert_eq!(stats.active, 0);

        prop_assert_eq!(cache.sweep_expired(), keys.len());
        prop_assert!(cache.is_empty());
    }
}
