use urlstore_types::{Shape, TypeError};

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Malformed or unsupported URL, or an unusable path prefix.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested object or prefix does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A decoded payload does not have the shape the reader asked for.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Shape, found: Shape },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A required configuration key has no value.
    #[error("missing configuration key: {0}")]
    MissingConfig(String),

    /// A configuration source could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` for the not-found class of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Map an I/O error on `target`, turning a missing file into [`StoreError::NotFound`].
    pub(crate) fn from_io(err: std::io::Error, target: &str) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(target.to_string())
        } else {
            Self::Io(err)
        }
    }
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::TypeMismatch { expected, found } => Self::TypeMismatch { expected, found },
            TypeError::UnsupportedScheme(_)
            | TypeError::InvalidUrl { .. }
            | TypeError::UnsupportedVersion(_) => Self::InvalidInput(err.to_string()),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
