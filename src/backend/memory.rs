//! In-Memory Backend Module
//!
//! Reference backend storing JSON values in a concurrent map with per-entry expiry.
//! Expired entries are dropped lazily on access and in bulk by [`MemoryBackend::purge_expired`].

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::backend::entry::current_timestamp_ms;
use crate::backend::stats::StatsCounters;
use crate::backend::{
    Backend, BackendStats, Clearable, MultiDelete, MultiGet, MultiPut, StoredEntry, MISS,
};

// == Memory Backend ==
/// Concurrent in-memory backend implementing every capability.
#[derive(Debug)]
pub struct MemoryBackend {
    /// Key-value storage
    entries: DashMap<String, StoredEntry>,
    /// Hit/miss counters
    stats: StatsCounters,
    /// Hides the multi-delete capability when false
    batch_delete: bool,
}

impl MemoryBackend {
    // == Constructors ==
    /// Creates an empty backend advertising every capability.
    pub fn new() -> Self {
        Self::with_batch_delete(true)
    }

    /// Creates an empty backend that does not advertise multi-delete.
    pub fn without_batch_delete() -> Self {
        Self::with_batch_delete(false)
    }

    /// Creates a backend with the multi-delete capability toggled by `enabled`.
    pub fn with_batch_delete(enabled: bool) -> Self {
        Self {
            entries: DashMap::new(),
            stats: StatsCounters::default(),
            batch_delete: enabled,
        }
    }

    // == Live Entry Access ==
    /// Runs `f` on the entry under `key` if it exists and has not expired.
    ///
    /// An expired entry found on the way is removed.
    fn with_live<R>(&self, key: &str, f: impl FnOnce(&StoredEntry) -> R) -> Option<R> {
        let now = current_timestamp_ms();
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => return Some(f(entry.value())),
            Some(_) => true,
            None => false,
        };

        if expired
            && self
                .entries
                .remove_if(key, |_, entry| entry.is_expired_at(now))
                .is_some()
        {
            self.stats.record_expired(1);
        }
        None
    }

    fn fetch_live(&self, key: &str) -> Option<Value> {
        let value = self.with_live(key, |entry| entry.value.clone());
        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    // == Cleanup Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut removed = 0usize;

        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        self.stats.record_expired(removed as u64);
        removed
    }

    // == Stats ==
    /// Returns current backend statistics.
    pub fn stats(&self) -> BackendStats {
        self.stats.snapshot(self.entries.len())
    }

    /// Returns the remaining lifetime of `key` in seconds.
    ///
    /// `None` when the key is absent or never expires.
    pub fn ttl_remaining(&self, key: &str) -> Option<u64> {
        self.with_live(key, StoredEntry::ttl_remaining).flatten()
    }

    /// Returns the number of entries held, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

// == Base Capability ==
impl Backend for MemoryBackend {
    fn fetch(&self, key: &str) -> Value {
        self.fetch_live(key).unwrap_or(MISS)
    }

    fn save(&self, key: &str, value: Value, ttl: Option<u64>) -> bool {
        self.entries
            .insert(key.to_string(), StoredEntry::new(value, ttl));
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.entries.remove(key);
        true
    }

    fn contains(&self, key: &str) -> bool {
        self.with_live(key, |_| ()).is_some()
    }

    fn as_clearable(self: Arc<Self>) -> Option<Arc<dyn Clearable>> {
        Some(self)
    }

    fn as_multi_get(self: Arc<Self>) -> Option<Arc<dyn MultiGet>> {
        Some(self)
    }

    fn as_multi_put(self: Arc<Self>) -> Option<Arc<dyn MultiPut>> {
        Some(self)
    }

    fn as_multi_delete(self: Arc<Self>) -> Option<Arc<dyn MultiDelete>> {
        if self.batch_delete {
            Some(self)
        } else {
            None
        }
    }
}

// == Optional Capabilities ==
impl Clearable for MemoryBackend {
    fn clear_all(&self) -> bool {
        let count = self.entries.len();
        self.entries.clear();
        debug!("Cleared {} entries", count);
        true
    }
}

impl MultiGet for MemoryBackend {
    fn fetch_many(&self, keys: &[String]) -> Map<String, Value> {
        keys.iter()
            .filter_map(|key| self.fetch_live(key).map(|value| (key.clone(), value)))
            .collect()
    }
}

impl MultiPut for MemoryBackend {
    fn save_many(&self, values: Map<String, Value>, ttl: Option<u64>) -> bool {
        for (key, value) in values {
            self.entries.insert(key, StoredEntry::new(value, ttl));
        }
        true
    }
}

impl MultiDelete for MemoryBackend {
    fn delete_many(&self, keys: &[String]) -> bool {
        for key in keys {
            self.entries.remove(key);
        }
        true
    }
}
