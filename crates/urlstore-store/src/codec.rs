//! Pluggable value serialization.
//!
//! The store itself only moves opaque bytes; a [`Codec`] turns [`Value`]s into
//! those bytes and back. Both built-in codecs keep the variant tag of every
//! value, which is what makes typed reads possible.

use urlstore_types::{Shape, Value};

use crate::error::{StoreError, StoreResult};

/// Converts values to bytes and back.
///
/// Implementations must round-trip every value they accept:
/// `decode(encode(v)) == v`.
pub trait Codec: Send + Sync {
    /// Short name, used in logs.
    fn name(&self) -> &'static str;

    fn encode(&self, value: &Value) -> StoreResult<Vec<u8>>;

    fn decode(&self, bytes: &[u8]) -> StoreResult<Value>;

    /// Decode and fail with `TypeMismatch` unless the result has shape `expected`.
    fn decode_typed(&self, bytes: &[u8], expected: Shape) -> StoreResult<Value> {
        Ok(self.decode(bytes)?.expect_shape(expected)?)
    }
}

/// JSON encoding (serde_json). Human-readable; the default codec.
///
/// JSON has no representation for NaN or infinities, so values containing
/// non-finite floats are refused at encode time instead of being silently
/// turned into `null`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, value: &Value) -> StoreResult<Vec<u8>> {
        ensure_finite(value)?;
        serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> StoreResult<Value> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

fn ensure_finite(value: &Value) -> StoreResult<()> {
    match value {
        Value::Float(f) if !f.is_finite() => Err(StoreError::Serialization(format!(
            "non-finite float {f} cannot be encoded as JSON"
        ))),
        Value::List(items) => items.iter().try_for_each(ensure_finite),
        Value::Map(map) => map.values().try_for_each(ensure_finite),
        _ => Ok(()),
    }
}

/// Compact binary encoding (bincode).
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn name(&self) -> &'static str {
        "bincode"
    }

    fn encode(&self, value: &Value) -> StoreResult<Vec<u8>> {
        bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> StoreResult<Value> {
        bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
