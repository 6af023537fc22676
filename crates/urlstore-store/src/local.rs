use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};
use urlstore_types::{validate_prefix, ObjectHandle};

use crate::codec::{Codec, JsonCodec};
use crate::config::{ConfigProvider, StoreConfig, WriteMode, WRITE_MODE_KEY};
use crate::error::{StoreError, StoreResult};
use crate::ident::{IdGenerator, UuidGenerator};
use crate::location::{store_root, ObjectLocation};
use crate::resolver::object_path;
use crate::traits::{DeleteMode, ObjectStore};

/// Object store over a local directory tree.
///
/// Objects live at `<root>/<prefix>/<id>`, where the root comes from the
/// `datastore.url` setting and `<id>` from the [`IdGenerator`]. The directory
/// tree is the only persisted state: there is no index of issued URLs.
///
/// Writers never lock. Safety under concurrent writers rests entirely on the
/// generator handing out distinct ids; deleting a prefix while another writer
/// is still writing under it is the caller's race to avoid.
pub struct LocalObjectStore {
    config: Arc<dyn ConfigProvider>,
    ids: Arc<dyn IdGenerator>,
    codec: Arc<dyn Codec>,
    write_mode: WriteMode,
}

impl LocalObjectStore {
    /// Create a store over `config`, naming objects with `ids`.
    ///
    /// The write mode is read from `datastore.write_mode` once, here; the
    /// default is [`WriteMode::Direct`]. Values are encoded with [`JsonCodec`]
    /// unless [`with_codec`](Self::with_codec) says otherwise.
    pub fn new(config: Arc<dyn ConfigProvider>, ids: Arc<dyn IdGenerator>) -> StoreResult<Self> {
        let write_mode = match config.get(WRITE_MODE_KEY) {
            Some(mode) => mode.parse()?,
            None => WriteMode::default(),
        };
        Ok(Self {
            config,
            ids,
            codec: Arc::new(JsonCodec),
            write_mode,
        })
    }

    /// Create a store from explicit settings with UUID object names.
    pub fn from_config(config: StoreConfig) -> Self {
        let write_mode = config.write_mode;
        Self {
            config: Arc::new(config),
            ids: Arc::new(UuidGenerator),
            codec: Arc::new(JsonCodec),
            write_mode,
        }
    }

    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    /// Absolute root directory, as currently configured.
    pub fn root(&self) -> StoreResult<PathBuf> {
        store_root(self.config.as_ref())
    }

    /// Absolute path of the object behind `handle`.
    pub fn path_of(&self, handle: &ObjectHandle) -> StoreResult<PathBuf> {
        Ok(object_path(&self.root()?, handle.url()))
    }
}

/// Write `data` to a temp file in `dir`, fsync it, and rename it to `pathname`.
fn write_atomic(dir: &Path, pathname: &Path, data: &[u8]) -> io::Result<()> {
    let mut tmp = tempfile::Builder::new().prefix(".tmp-").tempfile_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    if let Err(e) = tmp.persist(pathname) {
        let tempfile::PersistError { error, file } = e;
        if let Err(close_err) = file.close() {
            warn!(path = %pathname.display(), error = %close_err, "failed to remove temp file");
        }
        return Err(error);
    }
    Ok(())
}

impl ObjectStore for LocalObjectStore {
    fn write(&self, data: &[u8], prefix: Option<&str>) -> StoreResult<ObjectHandle> {
        let location = ObjectLocation::allocate(self.config.as_ref(), self.ids.as_ref(), prefix)?;
        let dir = self.root()?.join(&location.prefix);
        // create_dir_all tolerates concurrent creation of the same directory.
        fs::create_dir_all(&dir)?;

        let pathname = dir.join(&location.basename);
        match self.write_mode {
            WriteMode::Direct => fs::write(&pathname, data)?,
            WriteMode::Atomic => write_atomic(&dir, &pathname, data)?,
        }

        debug!(
            url = %location.url,
            bytes = data.len(),
            mode = %self.write_mode,
            "object written"
        );
        Ok(ObjectHandle::new(location.url))
    }

    fn read(&self, handle: &ObjectHandle) -> StoreResult<Vec<u8>> {
        let path = self.path_of(handle)?;
        let data = fs::read(&path).map_err(|e| StoreError::from_io(e, handle.url().as_str()))?;
        debug!(url = %handle, bytes = data.len(), "object read");
        Ok(data)
    }

    fn exists(&self, handle: &ObjectHandle) -> StoreResult<bool> {
        match fs::metadata(self.path_of(handle)?) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, prefix: &str, mode: DeleteMode) -> StoreResult<bool> {
        let prefix = validate_prefix(prefix)?;
        let dir = self.root()?.join(prefix);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                debug!(prefix, "prefix deleted");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => match mode {
                DeleteMode::Tolerant => {
                    debug!(prefix, "prefix already absent");
                    Ok(false)
                }
                DeleteMode::Strict => Err(StoreError::NotFound(prefix.to_string())),
            },
            Err(e) => Err(e.into()),
        }
    }

    fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }
}

impl std::fmt::Debug for LocalObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalObjectStore")
            .field("root", &self.root().ok())
            .field("codec", &self.codec.name())
            .field("write_mode", &self.write_mode)
            .finish()
    }
}
