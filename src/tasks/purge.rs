//! Expiry Purge Task
//!
//! Background task that periodically drops expired entries from the in-memory backend.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::backend::MemoryBackend;

/// Spawns a background task that purges expired entries every
/// `purge_interval_secs` seconds.
///
/// Expired entries are already invisible to readers; purging only reclaims
/// their memory. The returned handle is aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let backend = Arc::new(MemoryBackend::new());
/// let purge_handle = spawn_purge_task(backend.clone(), 1);
/// // Later, during shutdown:
/// purge_handle.abort();
/// ```
pub fn spawn_purge_task(backend: Arc<MemoryBackend>, purge_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(purge_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expiry purge task with interval of {} seconds",
            purge_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = backend.purge_expired();
            if removed > 0 {
                info!("Expiry purge: removed {} expired entries", removed);
            } else {
                debug!("Expiry purge: no expired entries found");
            }
        }
    })
}
