use thiserror::Error;

use crate::value::Shape;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid object URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Shape, found: Shape },

    #[error("unsupported handle state version: {0}")]
    UnsupportedVersion(u32),
}
