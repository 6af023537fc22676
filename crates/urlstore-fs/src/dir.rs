use std::env;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::warn;

use crate::error::FsResult;

/// Process working directory change that is undone on drop.
///
/// The working directory is process-wide state: while a `ScopedDir` is alive,
/// every thread sees the new directory.
#[derive(Debug)]
pub struct ScopedDir {
    previous: PathBuf,
    current: PathBuf,
    // Dropped after `Drop::drop` has restored the previous directory.
    _temp: Option<TempDir>,
}

impl ScopedDir {
    /// Enter `dir` until the guard is dropped.
    pub fn enter(dir: impl AsRef<Path>) -> FsResult<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(dir.as_ref())?;
        Ok(Self {
            previous,
            current: env::current_dir()?,
            _temp: None,
        })
    }

    /// Create a fresh temporary directory and enter it. On drop the previous
    /// directory is restored and the temporary one deleted.
    pub fn enter_temp() -> FsResult<Self> {
        let temp = tempfile::tempdir()?;
        let mut scoped = Self::enter(temp.path())?;
        scoped._temp = Some(temp);
        Ok(scoped)
    }

    /// The directory entered by this guard.
    pub fn path(&self) -> &Path {
        &self.current
    }

    /// The directory that will be restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            warn!(dir = %self.previous.display(), error = %e, "failed to restore working directory");
        }
    }
}
