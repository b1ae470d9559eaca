// Error types module

use thiserror::Error;

/// Errors raised by an [`AssetSource`](crate::source::AssetSource).
///
/// `NotFound` is kept distinct from other I/O failures so the HTTP adapter
/// can answer 404 instead of 500.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    /// Wrap an I/O error for `path`, folding `ErrorKind::NotFound` into
    /// [`SourceError::NotFound`].
    pub fn from_io(path: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound(path.to_string())
        } else {
            SourceError::Io {
                path: path.to_string(),
                source: err,
            }
        }
    }
}

/// Centralized error type for hashing and resolution.
#[derive(Error, Debug)]
pub enum HashFsError {
    /// Hash algorithm tag outside the supported set. Raised while parsing
    /// configuration, before anything is served.
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Hash location tag outside the supported set.
    #[error("unsupported hash location: {0}")]
    UnsupportedLocation(String),

    /// Invalid configuration (bad YAML, missing env vars, failed validation)
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl HashFsError {
    /// True when the underlying source reported the path as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, HashFsError::Source(SourceError::NotFound(_)))
    }

    /// True when the path was rejected before reaching the source.
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, HashFsError::Source(SourceError::InvalidPath(_)))
    }
}
