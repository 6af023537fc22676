//! Error types for filesystem helpers.

use thiserror::Error;

/// Errors from glob enumeration and directory scoping.
#[derive(Debug, Error)]
pub enum FsError {
    /// The caller passed something unusable, such as a missing source directory.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A glob pattern failed to compile.
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] ignore::Error),

    /// Directory traversal failed.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for filesystem helpers.
pub type FsResult<T> = std::result::Result<T, FsError>;
