use urlstore_types::{ObjectHandle, Shape, Value};

use crate::codec::Codec;
use crate::error::StoreResult;

/// How [`ObjectStore::delete`] treats a prefix that does not exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// A missing prefix is not an error; deletion is idempotent.
    #[default]
    Tolerant,
    /// A missing prefix fails with `NotFound`.
    Strict,
}

/// URL-addressed, write-once object store.
///
/// All implementations must satisfy these invariants:
/// - Every `write` allocates a fresh basename; objects are never updated in place.
/// - The handle is returned only after the full payload has been written.
/// - Concurrent reads are always safe (objects are immutable once written).
/// - The store never interprets payload bytes; typed access goes through the codec.
/// - Deletion works on whole prefixes, never on single objects.
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `prefix` (or the configured default prefix) and
    /// return a handle to it.
    fn write(&self, data: &[u8], prefix: Option<&str>) -> StoreResult<ObjectHandle>;

    /// Read the full payload behind `handle`.
    ///
    /// Fails with `NotFound` if the object does not exist.
    fn read(&self, handle: &ObjectHandle) -> StoreResult<Vec<u8>>;

    /// Check whether the object behind `handle` exists.
    fn exists(&self, handle: &ObjectHandle) -> StoreResult<bool>;

    /// Remove every object under `prefix`. Returns `true` if anything was removed.
    fn delete(&self, prefix: &str, mode: DeleteMode) -> StoreResult<bool>;

    /// The codec used by the value-level helpers.
    fn codec(&self) -> &dyn Codec;

    /// Serialize `value` and store it.
    fn write_value(&self, value: &Value, prefix: Option<&str>) -> StoreResult<ObjectHandle> {
        let data = self.codec().encode(value)?;
        self.write(&data, prefix)
    }

    /// Read and deserialize the value behind `handle`.
    fn read_value(&self, handle: &ObjectHandle) -> StoreResult<Value> {
        let data = self.read(handle)?;
        self.codec().decode(&data)
    }

    /// Read and deserialize, failing with `TypeMismatch` unless the value has
    /// shape `expected`.
    fn read_typed(&self, handle: &ObjectHandle, expected: Shape) -> StoreResult<Value> {
        let data = self.read(handle)?;
        self.codec().decode_typed(&data, expected)
    }
}
