//! Translation between object URLs and filesystem paths.
//!
//! Pure functions: nothing here touches the filesystem.

use std::path::{Path, PathBuf};

use urlstore_types::ObjectUrl;

use crate::error::StoreResult;

/// Resolve `url` to the relative path fragment it names.
///
/// `file:///a/b` resolves to `a/b`. The path is percent-decoded, so
/// `file:///my%20store` resolves to `my store`. Any scheme other than `file`,
/// or a `file:` URL without the triple slash, fails with `InvalidInput`.
pub fn resolve(url: &str) -> StoreResult<PathBuf> {
    let url = ObjectUrl::parse(url)?;
    Ok(url.relative_path().to_path_buf())
}

/// Resolve the configured root URL to an absolute directory.
///
/// The root goes through the same validation as object URLs and is anchored
/// at the filesystem root, so `file:///tmp/store` names `/tmp/store`.
pub fn resolve_root(root_url: &str) -> StoreResult<PathBuf> {
    Ok(Path::new("/").join(resolve(root_url)?))
}

/// Absolute path of the object named by `url` under `root`.
pub fn object_path(root: &Path, url: &ObjectUrl) -> PathBuf {
    root.join(url.relative_path())
}
