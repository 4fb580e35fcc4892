//! JSON and hex helpers with uniform error reporting.

use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};

pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Rejects blank input before handing it to serde.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }

    serde_json::from_str(json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {}", e)))
}

/// Base16-encoded JSON, used to move single policies between runs.
pub fn to_hex<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    let json = to_json(data)?;
    Ok(hex::encode(json.as_bytes()))
}

pub fn from_hex<T>(hex_str: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let trimmed = hex_str.trim();
    if trimmed.is_empty() {
        return Err(IoError::validation("Empty hex string"));
    }

    let bytes = hex::decode(trimmed)
        .map_err(|e| IoError::validation(format!("Invalid hex encoding: {}", e)))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| IoError::validation(format!("Invalid UTF-8 in hex: {}", e)))?;

    from_json(&json)
}
