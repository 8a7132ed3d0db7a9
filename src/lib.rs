//! Cache Adapter - exposes a key-value cache backend through a simple cache contract
//!
//! Validates keys, normalizes TTLs, negotiates backend capabilities and
//! tells stored `false` values apart from cache misses.

pub mod adapter;
pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use adapter::{SimpleCache, SimpleCacheAdapter, Ttl, TtlInterval};
pub use api::AppState;
pub use backend::{Backend, MemoryBackend};
pub use config::Config;
pub use error::{CacheError, ErrorKind, Result};
pub use tasks::spawn_purge_task;
