//! Request DTOs for the cache API
//!
//! Keys, key lists, value maps and TTLs are kept as raw JSON here. They are
//! checked by the adapter's dynamic input layer, which reports the received
//! type when the shape is wrong.

use serde::Deserialize;
use serde_json::Value;

/// Request body for PUT /set
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: Value,
    pub value: Value,
    /// Seconds, ISO-8601 duration or interval object
    #[serde(default)]
    pub ttl: Value,
}

/// Request body for POST /get
#[derive(Debug, Clone, Deserialize)]
pub struct GetRequest {
    pub key: Value,
    #[serde(default)]
    pub default: Value,
}

/// Request body for POST /get-multiple
#[derive(Debug, Clone, Deserialize)]
pub struct GetMultipleRequest {
    pub keys: Value,
    #[serde(default)]
    pub default: Value,
}

/// Request body for PUT /set-multiple
#[derive(Debug, Clone, Deserialize)]
pub struct SetMultipleRequest {
    /// Object of key/value pairs, or array of `[key, value]` pairs
    pub values: Value,
    #[serde(default)]
    pub ttl: Value,
}

/// Request body for POST /delete-multiple
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteMultipleRequest {
    pub keys: Value,
}
