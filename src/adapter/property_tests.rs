//! Property-Based Tests for the Adapter
//!
//! Uses proptest to check the adapter's contract over generated keys, values and TTLs.

use std::sync::Arc;

use proptest::prelude::*;
use serde_json::{json, Value};

use crate::adapter::{
    normalize, validate_key, Expiry, SimpleCache, SimpleCacheAdapter, Ttl, TtlInterval,
    RESERVED_CHARACTERS,
};
use crate::backend::MemoryBackend;
use crate::error::CacheError;

// == Strategies ==
/// Generates valid cache keys (non-empty, no reserved characters)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{1,64}"
}

/// Generates keys containing at least one reserved character
fn reserved_key_strategy() -> impl Strategy<Value = String> {
    (
        "[a-z0-9]{0,8}",
        prop::sample::select(RESERVED_CHARACTERS.to_vec()),
        "[a-z0-9]{0,8}",
    )
        .prop_map(|(prefix, c, suffix)| format!("{}{}{}", prefix, c, suffix))
}

/// Generates JSON values, including `false`, `null` and nested shapes
fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,32}".prop_map(Value::from),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|map| json!(map)),
        ]
    })
}

fn is_reserved<T>(result: Result<T, CacheError>) -> bool {
    matches!(result, Err(CacheError::ReservedCharacter { .. }))
}

fn adapter() -> SimpleCacheAdapter {
    SimpleCacheAdapter::new(Arc::new(MemoryBackend::new())).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Keys with a reserved character are refused by every key-taking operation,
    // and nothing reaches the backend.
    #[test]
    fn prop_reserved_keys_rejected(key in reserved_key_strategy()) {
        let backend = Arc::new(MemoryBackend::new());
        let cache = SimpleCacheAdapter::new(backend.clone()).unwrap();

        prop_assert!(is_reserved(cache.get(&key, Value::Null)));
        prop_assert!(is_reserved(cache.set(&key, json!(1), None)));
        prop_assert!(is_reserved(cache.delete(&key)));
        prop_assert!(is_reserved(cache.has(&key)));
        prop_assert!(is_reserved(cache.set_multiple(vec![(key.clone(), json!(1))], None)));
        prop_assert!(is_reserved(cache.delete_multiple([key.as_str()])));
        prop_assert!(is_reserved(cache.get_multiple([key.as_str()], Value::Null)));

        prop_assert!(backend.is_empty());
        prop_assert_eq!(backend.stats().misses, 0);
    }

    #[test]
    fn prop_valid_keys_accepted(key in valid_key_strategy()) {
        prop_assert!(validate_key(&key).is_ok());
    }

    // Whatever was stored comes back unchanged, `false` included.
    #[test]
    fn prop_roundtrip(key in valid_key_strategy(), value in value_strategy()) {
        let cache = adapter();

        prop_assert!(cache.set(&key, value.clone(), None).unwrap());
        prop_assert_eq!(cache.get(&key, json!("default")).unwrap(), value);
    }

    // A missing key always yields the caller's default.
    #[test]
    fn prop_missing_key_returns_default(key in valid_key_strategy(), default in value_strategy()) {
        let cache = adapter();
        prop_assert_eq!(cache.get(&key, default.clone()).unwrap(), default);
    }

    // Writing with TTL <= 0 behaves like a delete.
    #[test]
    fn prop_non_positive_ttl_deletes(
        key in valid_key_strategy(),
        value in value_strategy(),
        ttl in i64::MIN..=0i64
    ) {
        let cache = adapter();
        cache.set(&key, json!("previous"), None).unwrap();

        prop_assert!(cache.set(&key, value, Some(Ttl::Seconds(ttl))).unwrap());
        prop_assert!(!cache.has(&key).unwrap());
    }

    // get_multiple covers exactly the requested keys.
    #[test]
    fn prop_get_multiple_covers_request(
        stored in prop::collection::btree_map(valid_key_strategy(), value_strategy(), 0..8),
        extra in prop::collection::vec(valid_key_strategy(), 0..8)
    ) {
        let cache = adapter();
        cache.set_multiple(stored.clone(), None).unwrap();

        let requested: Vec<String> = stored.keys().cloned().chain(extra).collect();
        let result = cache.get_multiple(&requested, json!("default")).unwrap();

        for key in &requested {
            let expected = stored.get(key).cloned().unwrap_or_else(|| json!("default"));
            prop_assert_eq!(result.get(key), Some(&expected));
        }
        prop_assert!(result.keys().all(|key| requested.contains(key)));
    }

    // Positive seconds pass through untouched.
    #[test]
    fn prop_positive_seconds_pass_through(seconds in 1i64..=i64::MAX) {
        prop_assert_eq!(
            normalize("k", Some(&Ttl::Seconds(seconds))).unwrap(),
            Expiry::After(seconds as u64)
        );
    }

    // Day/hour/minute/second intervals have a fixed length.
    #[test]
    fn prop_fixed_interval_resolution(
        days in 0u32..10_000,
        hours in 0u32..48,
        minutes in 0u32..120,
        seconds in 0u32..120
    ) {
        let interval = TtlInterval { days, hours, minutes, seconds, ..TtlInterval::default() };
        let expected = i64::from(days) * 86_400
            + i64::from(hours) * 3_600
            + i64::from(minutes) * 60
            + i64::from(seconds);

        prop_assert_eq!(interval.to_seconds(), Some(expected));
        prop_assert_eq!(interval.inverted().to_seconds(), Some(-expected));
    }
}
