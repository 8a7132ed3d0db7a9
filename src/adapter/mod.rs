//! Adapter Module
//!
//! Exposes a [`Backend`] through the [`SimpleCache`] contract.
//!
//! Construction checks the backend's capabilities once; every operation
//! afterwards validates its keys and TTL before the backend is called.

mod delete;
pub mod dynamic;
mod key;
mod ttl;

#[cfg(test)]
mod property_tests;

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::backend::{is_miss, Backend, Capabilities, Clearable, MultiGet, MultiPut};
use crate::error::{CacheError, Result};

use delete::DeleteStrategy;

pub use key::{materialize_keys, validate_key, RESERVED_CHARACTERS};
pub use ttl::{normalize, Expiry, ParseIntervalError, Ttl, TtlInterval};

// == Cache Contract ==
/// Simple cache access contract.
pub trait SimpleCache {
    /// Returns the value under `key`, or `default` when the key is absent.
    fn get(&self, key: &str, default: Value) -> Result<Value>;

    /// Stores `value` under `key`. A TTL of zero or less deletes the key instead.
    fn set(&self, key: &str, value: Value, ttl: Option<Ttl>) -> Result<bool>;

    fn delete(&self, key: &str) -> Result<bool>;

    fn clear(&self) -> Result<bool>;

    /// Returns an entry for every requested key, in request order.
    fn get_multiple<I>(&self, keys: I, default: Value) -> Result<Map<String, Value>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>;

    fn set_multiple<I, K>(&self, values: I, ttl: Option<Ttl>) -> Result<bool>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>;

    fn delete_multiple<I>(&self, keys: I) -> Result<bool>
    where
        I: IntoIterator,
        I::Item: AsRef<str>;

    fn has(&self, key: &str) -> Result<bool>;
}

// == Adapter ==
/// Adapter over a backend that is clearable and supports multi-get and multi-put.
pub struct SimpleCacheAdapter {
    backend: Arc<dyn Backend>,
    clearable: Arc<dyn Clearable>,
    multi_get: Arc<dyn MultiGet>,
    multi_put: Arc<dyn MultiPut>,
    deletion: DeleteStrategy,
    backend_type: String,
}

impl SimpleCacheAdapter {
    // == Constructor ==
    /// Wraps `backend`, failing when it lacks a required capability.
    pub fn new<B: Backend + 'static>(backend: Arc<B>) -> Result<Self> {
        Self::from_dyn(backend, std::any::type_name::<B>())
    }

    /// Wraps an already type-erased backend. `backend_type` names it in errors.
    pub fn from_dyn(backend: Arc<dyn Backend>, backend_type: impl Into<String>) -> Result<Self> {
        let backend_type = backend_type.into();
        let capabilities = Capabilities::probe(&backend);

        let clearable = capabilities
            .clearable
            .ok_or_else(|| CacheError::NotClearable {
                backend: backend_type.clone(),
            })?;

        let (multi_get, multi_put) = match (capabilities.multi_get, capabilities.multi_put) {
            (Some(multi_get), Some(multi_put)) => (multi_get, multi_put),
            (None, None) => {
                return Err(CacheError::NotMultiOperation {
                    backend: backend_type,
                })
            }
            (None, Some(_)) => {
                return Err(CacheError::NotMultiGet {
                    backend: backend_type,
                })
            }
            (Some(_), None) => {
                return Err(CacheError::NotMultiPut {
                    backend: backend_type,
                })
            }
        };

        let deletion = DeleteStrategy::select(capabilities.multi_delete);
        debug!(
            backend = %backend_type,
            delete_strategy = deletion.name(),
            "Cache adapter ready"
        );

        Ok(Self {
            backend,
            clearable,
            multi_get,
            multi_put,
            deletion,
            backend_type,
        })
    }

    /// Type name of the wrapped backend.
    pub fn backend_type(&self) -> &str {
        &self.backend_type
    }

    /// True when batch deletes go through the backend's multi-delete.
    pub fn has_native_batch_delete(&self) -> bool {
        matches!(self.deletion, DeleteStrategy::Native(_))
    }

    fn delete_keys(&self, keys: &[String]) -> bool {
        self.deletion.delete_all(self.backend.as_ref(), keys)
    }
}

impl SimpleCache for SimpleCacheAdapter {
    fn get(&self, key: &str, default: Value) -> Result<Value> {
        validate_key(key)?;

        let value = self.backend.fetch(key);
        if !is_miss(&value) {
            return Ok(value);
        }

        // `false` is both the miss marker and a storable value
        if self.backend.contains(key) {
            debug!(key, "Fetched stored false value");
            Ok(value)
        } else {
            Ok(default)
        }
    }

    fn set(&self, key: &str, value: Value, ttl: Option<Ttl>) -> Result<bool> {
        validate_key(key)?;

        match normalize(key, ttl.as_ref())? {
            Expiry::Expired => {
                debug!(key, "TTL already elapsed, deleting instead of saving");
                Ok(self.backend.delete(key))
            }
            expiry => Ok(self.backend.save(key, value, expiry.as_backend_ttl())),
        }
    }

    fn delete(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.backend.delete(key))
    }

    fn clear(&self) -> Result<bool> {
        Ok(self.clearable.clear_all())
    }

    fn get_multiple<I>(&self, keys: I, default: Value) -> Result<Map<String, Value>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let keys = materialize_keys(keys)?;
        let found = self.multi_get.fetch_many(&keys);

        Ok(keys
            .into_iter()
            .map(|key| {
                let value = found.get(&key).cloned().unwrap_or_else(|| default.clone());
                (key, value)
            })
            .collect())
    }

    fn set_multiple<I, K>(&self, values: I, ttl: Option<Ttl>) -> Result<bool>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let values: Map<String, Value> = values
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();

        for key in values.keys() {
            validate_key(key)?;
        }

        let ttl_subject = values.keys().map(String::as_str).collect::<Vec<_>>().join(", ");
        match normalize(&ttl_subject, ttl.as_ref())? {
            Expiry::Expired => {
                let keys: Vec<String> = values.into_iter().map(|(key, _)| key).collect();
                debug!(count = keys.len(), "TTL already elapsed, deleting batch instead of saving");
                Ok(self.delete_keys(&keys))
            }
            expiry => Ok(self.multi_put.save_many(values, expiry.as_backend_ttl())),
        }
    }

    fn delete_multiple<I>(&self, keys: I) -> Result<bool>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let keys = materialize_keys(keys)?;
        Ok(self.delete_keys(&keys))
    }

    fn has(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.backend.contains(key))
    }
}

impl fmt::Debug for SimpleCacheAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleCacheAdapter")
            .field("backend_type", &self.backend_type)
            .field("delete_strategy", &self.deletion.name())
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use serde_json::json;

    fn adapter() -> SimpleCacheAdapter {
        SimpleCacheAdapter::new(Arc::new(MemoryBackend::new())).unwrap()
    }

    #[test]
    fn test_new_over_memory_backend() {
        let cache = adapter();
        assert!(cache.has_native_batch_delete());
        assert!(cache.backend_type().ends_with("MemoryBackend"));

        let cache = SimpleCacheAdapter::new(Arc::new(MemoryBackend::default())).unwrap();
        assert!(cache.has_native_batch_delete());

        let cache =
            SimpleCacheAdapter::new(Arc::new(MemoryBackend::without_batch_delete())).unwrap();
        assert!(!cache.has_native_batch_delete());
    }

    #[test]
    fn test_get_missing_returns_default() {
        let cache = adapter();
        assert_eq!(cache.get("missing", json!("fallback")).unwrap(), json!("fallback"));
        assert_eq!(cache.get("missing", Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_false_round_trip() {
        let cache = adapter();
        assert!(cache.set("flag", json!(false), None).unwrap());
        assert_eq!(cache.get("flag", json!("default")).unwrap(), json!(false));
    }

    #[test]
    fn test_set_with_non_positive_ttl_deletes() {
        let cache = adapter();
        cache.set("key", json!("value"), None).unwrap();

        assert!(cache.set("key", json!("other"), Some(Ttl::Seconds(0))).unwrap());
        assert!(!cache.has("key").unwrap());
        assert_eq!(cache.get("key", json!("d")).unwrap(), json!("d"));
    }

    #[test]
    fn test_get_multiple_fills_defaults_in_order() {
        let cache = adapter();
        cache
            .set_multiple(vec![("k1", json!("v1")), ("k2", json!("v2"))], None)
            .unwrap();

        let result = cache.get_multiple(["k3", "k1", "k2"], json!("d")).unwrap();
        let entries: Vec<(&String, &Value)> = result.iter().collect();
        assert_eq!(
            entries,
            vec![
                (&"k3".to_string(), &json!("d")),
                (&"k1".to_string(), &json!("v1")),
                (&"k2".to_string(), &json!("v2")),
            ]
        );
    }

    #[test]
    fn test_get_multiple_duplicate_keys() {
        let cache = adapter();
        cache.set("a", json!(1), None).unwrap();

        let result = cache.get_multiple(["a", "a", "b"], Value::Null).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result["a"], json!(1));
        assert_eq!(result["b"], Value::Null);
    }

    #[test]
    fn test_set_multiple_expired_ttl_deletes_batch() {
        let cache = adapter();
        cache.set("a", json!(1), None).unwrap();
        cache.set("b", json!(2), None).unwrap();

        let expired = Ttl::from(TtlInterval::seconds(30).inverted());
        assert!(cache
            .set_multiple(vec![("a", json!(9)), ("b", json!(9))], Some(expired))
            .unwrap());

        assert!(!cache.has("a").unwrap());
        assert!(!cache.has("b").unwrap());
    }

    #[test]
    fn test_delete_multiple_sequential_fallback() {
        let cache =
            SimpleCacheAdapter::new(Arc::new(MemoryBackend::without_batch_delete())).unwrap();
        cache.set("a", json!(1), None).unwrap();
        cache.set("b", json!(2), None).unwrap();

        assert!(cache.delete_multiple(["a", "b"]).unwrap());
        assert!(!cache.has("a").unwrap());
        assert!(!cache.has("b").unwrap());
    }

    #[test]
    fn test_invalid_key_rejected_everywhere() {
        let cache = adapter();
        let bad = "bad{key}";

        assert!(cache.get(bad, Value::Null).is_err());
        assert!(cache.set(bad, json!(1), None).is_err());
        assert!(cache.delete(bad).is_err());
        assert!(cache.has(bad).is_err());
        assert!(cache.get_multiple(["ok", bad], Value::Null).is_err());
        assert!(cache.set_multiple(vec![("ok", json!(1)), (bad, json!(2))], None).is_err());
        assert!(cache.delete_multiple(["ok", bad]).is_err());

        assert!(!cache.has("ok").unwrap(), "failed batch must not write");
    }

    #[test]
    fn test_ttl_out_of_range_names_batch_keys() {
        let cache = adapter();
        let ttl = Ttl::from(TtlInterval::years(u32::MAX));

        let err = cache
            .set_multiple(vec![("a", json!(1)), ("b", json!(2))], Some(ttl))
            .unwrap_err();
        assert_eq!(
            err,
            CacheError::TtlOutOfRange {
                key: "a, b".to_string()
            }
        );
    }

    #[test]
    fn test_clear() {
        let cache = adapter();
        cache.set("a", json!(1), None).unwrap();
        assert!(cache.clear().unwrap());
        assert!(!cache.has("a").unwrap());
    }
}
