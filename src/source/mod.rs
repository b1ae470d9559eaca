//! Backing filesystem abstraction
//!
//! An [`AssetSource`] is the read-only content store that [`HashFs`](crate::fs::HashFs)
//! wraps. Paths are slash-separated, relative, and clean: `css/site.css`, with
//! `.` naming the root. Two implementations ship with the crate:
//! - [`MemorySource`]: files held in memory, the equivalent of assets compiled
//!   into the binary
//! - [`DirSource`]: files under a directory on disk, read through `tokio::fs`

mod dir;
mod memory;

pub use dir::DirSource;
pub use memory::MemorySource;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::SourceError;

/// Path naming the root directory of a source
pub const ROOT_PATH: &str = ".";

/// Read-only access to named blobs
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Open a handle to the file or directory at `path`
    async fn open(&self, path: &str) -> Result<AssetFile, SourceError>;

    /// Read the entire contents of the file at `path`
    async fn read(&self, path: &str) -> Result<Bytes, SourceError>;
}

/// Size and kind of an opened entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetMetadata {
    pub len: u64,
    pub is_dir: bool,
}

/// Content of an opened entry
#[derive(Debug)]
pub enum AssetBody {
    /// Directories carry no content
    Empty,
    /// Content already in memory
    Bytes(Bytes),
    /// Seekable file handle, streamed by the HTTP adapter
    File(tokio::fs::File),
}

/// An opened file or directory
#[derive(Debug)]
pub struct AssetFile {
    metadata: AssetMetadata,
    body: AssetBody,
}

impl AssetFile {
    pub fn directory() -> Self {
        Self {
            metadata: AssetMetadata {
                len: 0,
                is_dir: true,
            },
            body: AssetBody::Empty,
        }
    }

    pub fn from_bytes(content: Bytes) -> Self {
        Self {
            metadata: AssetMetadata {
                len: content.len() as u64,
                is_dir: false,
            },
            body: AssetBody::Bytes(content),
        }
    }

    pub fn from_file(file: tokio::fs::File, len: u64) -> Self {
        Self {
            metadata: AssetMetadata { len, is_dir: false },
            body: AssetBody::File(file),
        }
    }

    pub fn metadata(&self) -> AssetMetadata {
        self.metadata
    }

    pub fn is_dir(&self) -> bool {
        self.metadata.is_dir
    }

    pub fn len(&self) -> u64 {
        self.metadata.len
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.len == 0
    }

    pub fn into_body(self) -> AssetBody {
        self.body
    }
}

/// Check that `path` is a clean, relative, slash-separated path.
///
/// `.` is valid and names the root. Empty elements, `.`/`..` elements, and
/// leading or trailing slashes are rejected.
pub fn is_valid_path(path: &str) -> bool {
    if path == ROOT_PATH {
        return true;
    }
    if path.is_empty() || path.contains('\\') || path.contains('\0') {
        return false;
    }
    path.split('/')
        .all(|elem| !elem.is_empty() && elem != "." && elem != "..")
}

/// Return `path` if valid, otherwise [`SourceError::InvalidPath`].
pub fn validate_path(path: &str) -> Result<&str, SourceError> {
    if is_valid_path(path) {
        Ok(path)
    } else {
        Err(SourceError::InvalidPath(path.to_string()))
    }
}
