//! Loosely-Typed Input
//!
//! Turns JSON input into validated adapter arguments. Anything the typed
//! adapter API rules out at compile time (a number where a key belongs, a
//! string where a key list belongs, a boolean TTL) is rejected here with an
//! invalid-argument error naming the received type.

use serde_json::{Map, Value};

use crate::adapter::key::validate_key;
use crate::adapter::ttl::{Ttl, TtlInterval};
use crate::error::{CacheError, Result};

/// Name of the JSON type of `value`, as reported in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// == Keys ==
/// Accepts a JSON string holding a valid key.
pub fn key_from_value(value: &Value) -> Result<String> {
    match value {
        Value::String(key) => {
            validate_key(key)?;
            Ok(key.clone())
        }
        other => Err(CacheError::InvalidKeyType {
            received: type_name(other).to_string(),
        }),
    }
}

/// Accepts a JSON array of keys, or an object whose values are the keys.
pub fn keys_from_value(value: Value) -> Result<Vec<String>> {
    let items: Vec<Value> = match value {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, key)| key).collect(),
        other => {
            return Err(CacheError::KeysNotIterable {
                received: type_name(&other).to_string(),
            })
        }
    };

    items.iter().map(key_from_value).collect()
}

// == Values ==
/// Accepts a JSON object of key/value pairs, or an array of `[key, value]`
/// pairs. Later duplicates overwrite earlier ones.
pub fn values_from_value(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => {
            for key in map.keys() {
                validate_key(key)?;
            }
            Ok(map)
        }
        Value::Array(items) => items.into_iter().map(pair_from_value).collect(),
        other => Err(CacheError::ValuesNotIterable {
            received: type_name(&other).to_string(),
        }),
    }
}

fn pair_from_value(item: Value) -> Result<(String, Value)> {
    match item {
        Value::Array(pair) if pair.len() == 2 => {
            let mut pair = pair.into_iter();
            let key = pair.next().unwrap_or(Value::Null);
            let value = pair.next().unwrap_or(Value::Null);
            Ok((key_from_value(&key)?, value))
        }
        other => Err(CacheError::ValuesNotIterable {
            received: format!("array of {}", type_name(&other)),
        }),
    }
}

// == TTL ==
/// Accepts null, an integer, an ISO-8601 duration string or an interval object.
pub fn ttl_from_value(key: &str, value: Value) -> Result<Option<Ttl>> {
    let invalid = |value: &Value| CacheError::InvalidTtl {
        key: key.to_string(),
        received: type_name(value).to_string(),
    };

    match value {
        Value::Null => Ok(None),
        Value::Number(ref n) => {
            if let Some(seconds) = n.as_i64() {
                Ok(Some(Ttl::Seconds(seconds)))
            } else if let Some(seconds) = n.as_u64() {
                Ok(Some(Ttl::from(seconds)))
            } else {
                Err(invalid(&value))
            }
        }
        Value::String(ref s) => s
            .parse::<TtlInterval>()
            .map(|interval| Some(Ttl::Interval(interval)))
            .map_err(|_| invalid(&value)),
        Value::Object(_) => {
            let received = invalid(&value);
            serde_json::from_value::<TtlInterval>(value)
                .map(|interval| Some(Ttl::Interval(interval)))
                .map_err(|_| received)
        }
        other => Err(invalid(&other)),
    }
}
