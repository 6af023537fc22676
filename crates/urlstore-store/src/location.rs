use std::path::PathBuf;

use urlstore_types::ObjectUrl;

use crate::config::{require, ConfigProvider, PREFIX_KEY, ROOT_URL_KEY};
use crate::error::{StoreError, StoreResult};
use crate::ident::IdGenerator;
use crate::resolver::resolve_root;

/// Where a new object goes: the effective prefix, a fresh basename, and the
/// URL that names the pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectLocation {
    pub prefix: String,
    pub basename: String,
    pub url: ObjectUrl,
}

impl ObjectLocation {
    /// Allocate the location for the next object.
    ///
    /// `prefix` falls back to the configured default prefix when absent. The
    /// basename comes from `ids` and is trusted to be unique.
    pub fn allocate(
        config: &dyn ConfigProvider,
        ids: &dyn IdGenerator,
        prefix: Option<&str>,
    ) -> StoreResult<Self> {
        let prefix = config
            .default_if_null(prefix, PREFIX_KEY)
            .ok_or_else(|| StoreError::MissingConfig(PREFIX_KEY.to_string()))?;
        let basename = ids.next_id();
        let url = ObjectUrl::from_parts(&prefix, &basename)?;
        Ok(Self {
            prefix: url.prefix().to_string(),
            basename,
            url,
        })
    }
}

/// Resolve the configured store root to an absolute directory.
pub fn store_root(config: &dyn ConfigProvider) -> StoreResult<PathBuf> {
    resolve_root(&require(config, ROOT_URL_KEY)?)
}
