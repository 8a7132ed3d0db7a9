//! Backend Module
//!
//! Capability contract the adapter consumes, plus an in-memory reference backend.
//!
//! A backend always provides the base operations. Bulk clearing and the
//! multi-key operations are optional capability groups, advertised through the
//! `as_*` accessors on [`Backend`]. Each accessor hands back the backend itself
//! as a capability trait object when supported, `None` otherwise.

mod entry;
mod memory;
mod stats;

use std::sync::Arc;

use serde_json::{Map, Value};

pub use entry::StoredEntry;
pub use memory::MemoryBackend;
pub use stats::BackendStats;

// == Miss Sentinel ==
/// Value a backend's `fetch` returns for a missing key.
///
/// A stored `false` is returned the same way, so callers cannot tell the two
/// apart without a `contains` check.
pub const MISS: Value = Value::Bool(false);

/// Returns true if a fetched value equals the miss sentinel.
pub fn is_miss(value: &Value) -> bool {
    *value == MISS
}

// == Base Capability ==
/// Point operations every backend supports.
pub trait Backend: Send + Sync {
    /// Fetches the value stored under `key`, or [`MISS`] when absent.
    fn fetch(&self, key: &str) -> Value;

    /// Stores `value` under `key`. `ttl` is a positive number of seconds,
    /// `None` means the entry never expires.
    fn save(&self, key: &str, value: Value, ttl: Option<u64>) -> bool;

    fn delete(&self, key: &str) -> bool;

    fn contains(&self, key: &str) -> bool;

    fn as_clearable(self: Arc<Self>) -> Option<Arc<dyn Clearable>> {
        None
    }

    fn as_multi_get(self: Arc<Self>) -> Option<Arc<dyn MultiGet>> {
        None
    }

    fn as_multi_put(self: Arc<Self>) -> Option<Arc<dyn MultiPut>> {
        None
    }

    fn as_multi_delete(self: Arc<Self>) -> Option<Arc<dyn MultiDelete>> {
        None
    }
}

// == Optional Capabilities ==
/// Bulk removal of every entry.
pub trait Clearable: Send + Sync {
    fn clear_all(&self) -> bool;
}

/// Multi-key fetch.
pub trait MultiGet: Send + Sync {
    /// Returns the entries found among `keys`. Missing keys are left out of
    /// the returned map.
    fn fetch_many(&self, keys: &[String]) -> Map<String, Value>;
}

/// Multi-key save.
pub trait MultiPut: Send + Sync {
    fn save_many(&self, values: Map<String, Value>, ttl: Option<u64>) -> bool;
}

/// Multi-key delete.
pub trait MultiDelete: Send + Sync {
    fn delete_many(&self, keys: &[String]) -> bool;
}

// == Capability Descriptor ==
/// Result of probing a backend for its optional capabilities.
pub struct Capabilities {
    pub clearable: Option<Arc<dyn Clearable>>,
    pub multi_get: Option<Arc<dyn MultiGet>>,
    pub multi_put: Option<Arc<dyn MultiPut>>,
    pub multi_delete: Option<Arc<dyn MultiDelete>>,
}

impl Capabilities {
    /// Probes every optional capability of `backend` once.
    pub fn probe(backend: &Arc<dyn Backend>) -> Self {
        Self {
            clearable: Arc::clone(backend).as_clearable(),
            multi_get: Arc::clone(backend).as_multi_get(),
            multi_put: Arc::clone(backend).as_multi_put(),
            multi_delete: Arc::clone(backend).as_multi_delete(),
        }
    }

    pub fn is_clearable(&self) -> bool {
        self.clearable.is_some()
    }

    /// True when fetch-many and save-many are both present. Delete-many is
    /// optional; without it batch deletes run one key at a time.
    pub fn is_multi_operation(&self) -> bool {
        self.multi_get.is_some() && self.multi_put.is_some()
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("clearable", &self.clearable.is_some())
            .field("multi_get", &self.multi_get.is_some())
            .field("multi_put", &self.multi_put.is_some())
            .field("multi_delete", &self.multi_delete.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BareBackend;

    impl Backend for BareBackend {
        fn fetch(&self, _key: &str) -> Value {
            MISS
        }

        fn save(&self, _key: &str, _value: Value, _ttl: Option<u64>) -> bool {
            true
        }

        fn delete(&self, _key: &str) -> bool {
            true
        }

        fn contains(&self, _key: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_is_miss() {
        assert!(is_miss(&Value::Bool(false)));
        assert!(!is_miss(&Value::Null));
        assert!(!is_miss(&Value::from(0)));
        assert!(!is_miss(&Value::from("")));
    }

    #[test]
    fn test_probe_bare_backend() {
        let backend: Arc<dyn Backend> = Arc::new(BareBackend);
        let caps = Capabilities::probe(&backend);

        assert!(!caps.is_clearable());
        assert!(!caps.is_multi_operation());
        assert!(caps.multi_get.is_none());
    }

    #[test]
    fn test_probe_memory_backend() {
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new());
        let caps = Capabilities::probe(&backend);

        assert!(caps.is_clearable());
        assert!(caps.is_multi_operation());
    }

    #[test]
    fn test_probe_memory_backend_without_batch_delete() {
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::without_batch_delete());
        let caps = Capabilities::probe(&backend);

        assert!(caps.is_clearable());
        assert!(caps.multi_get.is_some());
        assert!(caps.multi_put.is_some());
        assert!(caps.multi_delete.is_none());
        assert!(caps.is_multi_operation());
        assert!(crate::adapter::SimpleCacheAdapter::from_dyn(backend, "memory").is_ok());
    }
}
