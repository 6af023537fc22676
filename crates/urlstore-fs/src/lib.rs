//! Filesystem helpers used around the object store.
//!
//! - [`globs`] — enumerate files under a directory by include/exclude globs
//! - [`ScopedDir`] — change the working directory for the lifetime of a guard,
//!   optionally into a fresh temporary directory

pub mod dir;
pub mod error;
pub mod glob;

pub use dir::ScopedDir;
pub use error::{FsError, FsResult};
pub use glob::{globs, MATCH_ALL};
