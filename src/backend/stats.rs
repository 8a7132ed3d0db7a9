//! Backend Statistics Module
//!
//! Tracks hit/miss counters for the in-memory backend.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Backend Stats ==
/// Snapshot of backend performance counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackendStats {
    /// Number of fetches that found a live entry
    pub hits: u64,
    /// Number of fetches that found nothing (absent or expired)
    pub misses: u64,
    /// Number of expired entries removed
    pub expired: u64,
    /// Current number of entries held
    pub total_entries: usize,
}

impl BackendStats {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no fetches have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Counters ==
/// Lock-free counters shared by concurrent backend calls.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_expired(&self, count: u64) {
        self.expired.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, total_entries: usize) -> BackendStats {
        BackendStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            total_entries,
        }
    }
}
