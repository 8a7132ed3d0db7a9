//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the service is up.
//!
//! # Tasks
//! - Expiry purge: Removes expired entries from the in-memory backend

mod purge;

pub use purge::spawn_purge_task;
