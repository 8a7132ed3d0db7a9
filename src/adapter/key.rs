//! Key Validation
//!
//! Every key that reaches the backend passes through here first.

use crate::error::{CacheError, Result};

/// Characters reserved for backend-specific key namespacing.
pub const RESERVED_CHARACTERS: [char; 8] = ['{', '}', '(', ')', '/', '\\', '@', ':'];

// == Validate Key ==
/// Checks that `key` is non-empty and free of reserved characters.
pub fn validate_key(key: &str) -> Result<&str> {
    if key.is_empty() {
        return Err(CacheError::EmptyKey);
    }

    if let Some(character) = key.chars().find(|c| RESERVED_CHARACTERS.contains(c)) {
        return Err(CacheError::ReservedCharacter {
            key: key.to_string(),
            character,
        });
    }

    Ok(key)
}

// == Materialize Keys ==
/// Drains `keys` into an owned list, then validates every entry.
///
/// The iterator is consumed in full before the first key is checked, so an
/// infinite iterator never returns.
pub fn materialize_keys<I>(keys: I) -> Result<Vec<String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let keys: Vec<String> = keys
        .into_iter()
        .map(|key| key.as_ref().to_string())
        .collect();

    for key in &keys {
        validate_key(key)?;
    }

    Ok(keys)
}
