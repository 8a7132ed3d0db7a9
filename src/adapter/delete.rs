//! Batch Delete Strategy
//!
//! Chosen once at construction from the backend's capabilities.

use std::sync::Arc;

use crate::backend::{Backend, MultiDelete};

pub(crate) enum DeleteStrategy {
    /// One call to the backend's multi-delete.
    Native(Arc<dyn MultiDelete>),
    /// One point delete per key. Every key is attempted; the result is true
    /// only if all of them succeeded.
    Sequential,
}

impl DeleteStrategy {
    pub(crate) fn select(multi_delete: Option<Arc<dyn MultiDelete>>) -> Self {
        match multi_delete {
            Some(native) => DeleteStrategy::Native(native),
            None => DeleteStrategy::Sequential,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            DeleteStrategy::Native(_) => "native",
            DeleteStrategy::Sequential => "sequential",
        }
    }

    pub(crate) fn delete_all(&self, backend: &dyn Backend, keys: &[String]) -> bool {
        match self {
            DeleteStrategy::Native(native) => native.delete_many(keys),
            DeleteStrategy::Sequential => keys
                .iter()
                .fold(true, |success, key| backend.delete(key) && success),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use serde_json::json;

    #[test]
    fn test_select() {
        assert_eq!(DeleteStrategy::select(None).name(), "sequential");

        let backend = Arc::new(MemoryBackend::new());
        let native: Arc<dyn MultiDelete> = backend;
        assert_eq!(DeleteStrategy::select(Some(native)).name(), "native");
    }

    #[test]
    fn test_sequential_deletes_every_key() {
        let backend = MemoryBackend::without_batch_delete();
        backend.save("a", json!(1), None);
        backend.save("b", json!(2), None);

        let keys = vec!["a".to_string(), "b".to_string()];
        assert!(DeleteStrategy::Sequential.delete_all(&backend, &keys));
        assert!(backend.is_empty());
    }
}
