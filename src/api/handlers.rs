//! API Handlers
//!
//! HTTP request handlers mapping JSON requests onto the cache adapter.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::adapter::dynamic::{key_from_value, keys_from_value, ttl_from_value, values_from_value};
use crate::adapter::{SimpleCache, SimpleCacheAdapter};
use crate::backend::MemoryBackend;
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    DeleteMultipleRequest, GetMultipleRequest, GetMultipleResponse, GetRequest, GetResponse,
    HasResponse, HealthResponse, KeyResultResponse, SetMultipleRequest, SetRequest,
    StatsResponse, SuccessResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache contract over the backend
    pub cache: Arc<SimpleCacheAdapter>,
    /// Backend handle, kept for statistics and purging
    pub backend: Arc<MemoryBackend>,
}

impl AppState {
    /// Creates a new AppState wrapping `backend` in an adapter.
    pub fn new(backend: Arc<MemoryBackend>) -> Result<Self> {
        let cache = SimpleCacheAdapter::new(Arc::clone(&backend))?;
        Ok(Self {
            cache: Arc::new(cache),
            backend,
        })
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = MemoryBackend::with_batch_delete(config.native_batch_delete);
        Self::new(Arc::new(backend))
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<KeyResultResponse>> {
    let key = key_from_value(&req.key)?;
    let ttl = ttl_from_value(&key, req.ttl)?;

    let success = state.cache.set(&key, req.value, ttl)?;
    Ok(Json(KeyResultResponse::new(key, success)))
}

/// Handler for POST /get
pub async fn get_handler(
    State(state): State<AppState>,
    Json(req): Json<GetRequest>,
) -> Result<Json<GetResponse>> {
    let key = key_from_value(&req.key)?;

    let value = state.cache.get(&key, req.default)?;
    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for GET /has/:key
pub async fn has_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<HasResponse>> {
    let exists = state.cache.has(&key)?;
    Ok(Json(HasResponse::new(key, exists)))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyResultResponse>> {
    let success = state.cache.delete(&key)?;
    Ok(Json(KeyResultResponse::new(key, success)))
}

/// Handler for POST /clear
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<SuccessResponse>> {
    let success = state.cache.clear()?;
    Ok(Json(SuccessResponse { success }))
}

/// Handler for POST /get-multiple
pub async fn get_multiple_handler(
    State(state): State<AppState>,
    Json(req): Json<GetMultipleRequest>,
) -> Result<Json<GetMultipleResponse>> {
    let keys = keys_from_value(req.keys)?;

    let values = state.cache.get_multiple(keys, req.default)?;
    Ok(Json(GetMultipleResponse { values }))
}

/// Handler for PUT /set-multiple
pub async fn set_multiple_handler(
    State(state): State<AppState>,
    Json(req): Json<SetMultipleRequest>,
) -> Result<Json<SuccessResponse>> {
    let values = values_from_value(req.values)?;
    let subject = values.keys().map(String::as_str).collect::<Vec<_>>().join(", ");
    let ttl = ttl_from_value(&subject, req.ttl)?;

    let success = state.cache.set_multiple(values, ttl)?;
    Ok(Json(SuccessResponse { success }))
}

/// Handler for POST /delete-multiple
pub async fn delete_multiple_handler(
    State(state): State<AppState>,
    Json(req): Json<DeleteMultipleRequest>,
) -> Result<Json<SuccessResponse>> {
    let keys = keys_from_value(req.keys)?;

    let success = state.cache.delete_multiple(keys)?;
    Ok(Json(SuccessResponse { success }))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.backend.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
