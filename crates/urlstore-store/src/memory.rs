use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use urlstore_types::{validate_prefix, ObjectHandle, ObjectUrl};

use crate::codec::{Codec, JsonCodec};
use crate::config::ConfigProvider;
use crate::error::{StoreError, StoreResult};
use crate::ident::{IdGenerator, UuidGenerator};
use crate::location::ObjectLocation;
use crate::traits::{DeleteMode, ObjectStore};

/// In-memory object store.
///
/// Issues the same URL shapes as [`LocalObjectStore`](crate::LocalObjectStore)
/// but keeps payloads in a map behind a `RwLock`. Intended for tests and
/// embedding. The root setting is ignored; only the default prefix is used.
pub struct InMemoryObjectStore {
    config: Arc<dyn ConfigProvider>,
    ids: Arc<dyn IdGenerator>,
    codec: Arc<dyn Codec>,
    objects: RwLock<BTreeMap<ObjectUrl, Vec<u8>>>,
}

impl InMemoryObjectStore {
    /// Create an empty store with UUID object names and the JSON codec.
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self::with_generator(config, Arc::new(UuidGenerator))
    }

    pub fn with_generator(config: Arc<dyn ConfigProvider>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            config,
            ids,
            codec: Arc::new(JsonCodec),
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored objects.
    pub fn total_bytes(&self) -> u64 {
        self.objects
            .read()
            .expect("lock poisoned")
            .values()
            .map(|data| data.len() as u64)
            .sum()
    }

    /// Sorted URLs of all stored objects.
    pub fn all_urls(&self) -> Vec<ObjectUrl> {
        self.objects
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

impl ObjectStore for InMemoryObjectStore {
    fn write(&self, data: &[u8], prefix: Option<&str>) -> StoreResult<ObjectHandle> {
        let location = ObjectLocation::allocate(self.config.as_ref(), self.ids.as_ref(), prefix)?;
        let mut map = self.objects.write().expect("lock poisoned");
        map.insert(location.url.clone(), data.to_vec());
        Ok(ObjectHandle::new(location.url))
    }

    fn read(&self, handle: &ObjectHandle) -> StoreResult<Vec<u8>> {
        let map = self.objects.read().expect("lock poisoned");
        map.get(handle.url())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(handle.url().to_string()))
    }

    fn exists(&self, handle: &ObjectHandle) -> StoreResult<bool> {
        let map = self.objects.read().expect("lock poisoned");
        Ok(map.contains_key(handle.url()))
    }

    fn delete(&self, prefix: &str, mode: DeleteMode) -> StoreResult<bool> {
        let prefix = validate_prefix(prefix)?;
        let mut map = self.objects.write().expect("lock poisoned");
        let before = map.len();
        map.retain(|url, _| !url.is_under(prefix));
        let removed = map.len() < before;
        if !removed && mode == DeleteMode::Strict {
            return Err(StoreError::NotFound(prefix.to_string()));
        }
        Ok(removed)
    }

    fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &count)
            .field("codec", &self.codec.name())
            .finish()
    }
}
