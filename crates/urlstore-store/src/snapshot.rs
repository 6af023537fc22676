use std::ops::{Deref, DerefMut};

use urlstore_types::{Mapping, ObjectHandle, Shape, Value};

use crate::error::StoreResult;
use crate::traits::ObjectStore;

/// A key-value mapping persisted as one object.
///
/// The snapshot behaves like the [`Mapping`] it wraps. [`to_url`](Self::to_url)
/// stores the whole mapping at once and returns the URL as a plain string, so
/// it can be embedded in other stored values; [`from_url`](Self::from_url)
/// loads it back and refuses payloads that are not mappings.
#[derive(Clone, Debug, PartialEq)]
pub struct MappingSnapshot {
    // Always `Value::Map`.
    value: Value,
}

impl MappingSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> Mapping {
        match self.value {
            Value::Map(entries) => entries,
            _ => unreachable!("snapshot always holds a mapping"),
        }
    }

    /// The snapshot as the [`Value`] that gets stored.
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Store the mapping under the default prefix and return its URL.
    pub fn to_url(&self, store: &dyn ObjectStore) -> StoreResult<String> {
        self.store_in(store, None)
    }

    /// Store the mapping under `prefix` and return its URL.
    pub fn to_url_in(&self, store: &dyn ObjectStore, prefix: &str) -> StoreResult<String> {
        self.store_in(store, Some(prefix))
    }

    fn store_in(&self, store: &dyn ObjectStore, prefix: Option<&str>) -> StoreResult<String> {
        let handle = store.write_value(&self.value, prefix)?;
        Ok(handle.into_url().into())
    }

    /// Load a snapshot from `url`.
    ///
    /// Fails with `InvalidInput` for a malformed URL, `NotFound` if nothing is
    /// stored there, and `TypeMismatch` if the payload is not a mapping.
    pub fn from_url(store: &dyn ObjectStore, url: &str) -> StoreResult<Self> {
        let handle = ObjectHandle::parse(url)?;
        let value = store.read_typed(&handle, Shape::Map)?;
        Ok(Self::from(value.into_map()?))
    }
}

impl Default for MappingSnapshot {
    fn default() -> Self {
        Self::from(Mapping::new())
    }
}

impl Deref for MappingSnapshot {
    type Target = Mapping;

    fn deref(&self) -> &Self::Target {
        match &self.value {
            Value::Map(entries) => entries,
            _ => unreachable!("snapshot always holds a mapping"),
        }
    }
}

impl DerefMut for MappingSnapshot {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match &mut self.value {
            Value::Map(entries) => entries,
            _ => unreachable!("snapshot always holds a mapping"),
        }
    }
}

impl From<Mapping> for MappingSnapshot {
    fn from(entries: Mapping) -> Self {
        Self {
            value: Value::Map(entries),
        }
    }
}

impl From<MappingSnapshot> for Value {
    fn from(snapshot: MappingSnapshot) -> Self {
        snapshot.value
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MappingSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<Mapping>()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::StoreConfig;
    use crate::error::StoreError;
    use crate::local::LocalObjectStore;
    use crate::memory::InMemoryObjectStore;
    use crate::traits::DeleteMode;

    fn local_store() -> (tempfile::TempDir, LocalObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(format!("file://{}", dir.path().display()), "runs");
        (dir, LocalObjectStore::from_config(config))
    }

    #[test]
    fn store_and_load_then_delete() {
        let (_dir, store) = local_store();
        let snapshot: MappingSnapshot = [("a", 1)].into_iter().collect();

        let url = snapshot.to_url(&store).unwrap();
        let basename = url.strip_prefix("file:///runs/").expect("default prefix");
        assert_eq!(basename.len(), 32);
        assert!(basename.chars().all(|c| c.is_ascii_hexdigit()));

        let loaded = MappingSnapshot::from_url(&store, &url).unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.get("a"), Some(&Value::Int(1)));

        store.delete("runs", DeleteMode::Tolerant).unwrap();
        let err = MappingSnapshot::from_url(&store, &url).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn nested_snapshot_urls() {
        let store = InMemoryObjectStore::new(Arc::new(StoreConfig::new("file:///unused", "runs")));

        let mut inner = MappingSnapshot::new();
        inner.insert("loss".into(), Value::Float(0.25));
        let inner_url = inner.to_url_in(&store, "exp1/metrics").unwrap();

        let mut outer = MappingSnapshot::new();
        outer.insert("metrics".into(), Value::Str(inner_url.clone()));
        outer.insert("name".into(), "exp1".into());
        let outer_url = outer.to_url_in(&store, "exp1").unwrap();

        let loaded = MappingSnapshot::from_url(&store, &outer_url).unwrap();
        let link = loaded.get("metrics").and_then(Value::as_str).unwrap();
        assert_eq!(link, inner_url);
        let metrics = MappingSnapshot::from_url(&store, link).unwrap();
        assert_eq!(metrics.get("loss"), Some(&Value::Float(0.25)));
    }

    #[test]
    fn non_mapping_payload_is_rejected() {
        let store = InMemoryObjectStore::new(Arc::new(StoreConfig::new("file:///unused", "runs")));
        let handle = store.write_value(&Value::List(vec![Value::Int(1)]), None).unwrap();
        let err = MappingSnapshot::from_url(&store, handle.url().as_str()).unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch { .. }));
    }

    #[test]
    fn malformed_url_is_invalid_input() {
        let store = InMemoryObjectStore::new(Arc::new(StoreConfig::new("file:///unused", "runs")));
        for url in ["http://x/y", "file://host/y"] {
            let err = MappingSnapshot::from_url(&store, url).unwrap_err();
            assert!(matches!(err, StoreError::InvalidInput(_)), "{url}: {err}");
        }
    }

    #[test]
    fn stored_bytes_are_the_encoded_mapping() {
        let store = InMemoryObjectStore::new(Arc::new(StoreConfig::new("file:///unused", "runs")));
        let mut snapshot: MappingSnapshot = [("a", 1), ("b", 2)].into_iter().collect();

        let url = snapshot.to_url(&store).unwrap();
        let stored = store.read(&ObjectHandle::parse(&url).unwrap()).unwrap();
        assert_eq!(stored, store.codec().encode(snapshot.as_value()).unwrap());

        // Still usable and mutable after storing.
        snapshot.insert("c".into(), Value::Int(3));
        assert_eq!(snapshot.as_value().shape(), Shape::Map);
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn behaves_like_a_mapping() {
        let mut snapshot = MappingSnapshot::new();
        assert!(snapshot.is_empty());
        snapshot.insert("k".into(), Value::Bool(true));
        assert_eq!(snapshot.len(), 1);
        let value: Value = snapshot.clone().into();
        assert_eq!(value.shape(), Shape::Map);
        assert_eq!(snapshot.into_inner().len(), 1);
    }
}
