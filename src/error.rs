//! Error types for the cache adapter
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Error Kind ==
/// Broad classification of a [`CacheError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend lacks a capability the adapter requires
    Capability,
    /// A caller-supplied argument failed validation
    InvalidArgument,
}

// == Cache Error Enum ==
/// Unified error type for the cache adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error(
        "The given cache {backend} was not clearable, but you tried to use a feature that requires a clearable cache."
    )]
    NotClearable { backend: String },

    #[error(
        "The given cache {backend} does not support multiple operations, but you tried to use a feature that requires a multi-operation cache."
    )]
    NotMultiOperation { backend: String },

    #[error(
        "The given cache {backend} cannot multi-get, but you tried to use a feature that requires a multi-get cache."
    )]
    NotMultiGet { backend: String },

    #[error(
        "The given cache {backend} cannot multi-put, but you tried to use a feature that requires a multi-put cache."
    )]
    NotMultiPut { backend: String },

    /// Key was supplied as something other than a string
    #[error("Cache key must be a string, but {received} is given.")]
    InvalidKeyType { received: String },

    #[error("Cache key must not be an empty string.")]
    EmptyKey,

    #[error("Cache key \"{key}\" contains reserved character '{character}'.")]
    ReservedCharacter { key: String, character: char },

    #[error("Cache keys must be an array or iterable, but {received} is given.")]
    KeysNotIterable { received: String },

    #[error("Cache values must be a map or iterable of key/value pairs, but {received} is given.")]
    ValuesNotIterable { received: String },

    #[error(
        "TTL for \"{key}\" should be defined by an integer or a duration interval, but {received} is given."
    )]
    InvalidTtl { key: String, received: String },

    #[error("TTL for \"{key}\" is out of the representable range.")]
    TtlOutOfRange { key: String },
}

impl CacheError {
    /// Returns which of the two error families this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CacheError::NotClearable { .. }
            | CacheError::NotMultiOperation { .. }
            | CacheError::NotMultiGet { .. }
            | CacheError::NotMultiPut { .. } => ErrorKind::Capability,
            _ => ErrorKind::InvalidArgument,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    pub fn is_capability(&self) -> bool {
        self.kind() == ErrorKind::Capability
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::Capability => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache adapter.
pub type Result<T> = std::result::Result<T, CacheError>;
