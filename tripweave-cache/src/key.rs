//! Content-addressed cache key derivation.
//!
//! Keys depend only on the operation name and the semantic content of the
//! argument payload. Object keys are sorted recursively before hashing so
//! field ordering never changes the key; sequence order is kept because
//! it is semantically meaningful for ordered inputs such as item lists.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tripweave_core::SerializationError;

/// Derive the cache key for `operation` called with `payload`.
///
/// Returns `"{operation}:{hex_digest}"` where the digest is SHA-256 over
/// the operation name followed by the canonical JSON form of the payload.
/// Deterministic across process restarts: no map-iteration order, object
/// identity, or addresses feed the digest.
pub fn build_key<P: Serialize>(
    operation: &str,
    payload: &P,
) -> Result<String, SerializationError> {
    let value = serde_json::to_value(payload).map_err(|e| {
        SerializationError::UnserializablePayload {
            operation: operation.to_string(),
            reason: e.to_string(),
        }
    })?;

    let mut canonical = String::new();
    write_canonical(&value, &mut canonical);

    let mut hasher = Sha256::new();
    hasher.update(operation.as_bytes());
    hasher.update(canonical.as_bytes());
    Ok(format!("{}:{}", operation, hex::encode(hasher.finalize())))
}

/// Serialize `value` with recursively sorted object keys and no
/// insignificant whitespace.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, k) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*k).clone()).to_string());
                out.push(':');
                write_canonical(&map[*k], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
