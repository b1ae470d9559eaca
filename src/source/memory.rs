//! In-memory asset source (HashMap storage)

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use super::{validate_path, AssetFile, AssetSource, ROOT_PATH};
use crate::error::SourceError;

/// Source that serves files held in memory.
///
/// Directories are implicit: `css` is a directory when some file lives under
/// `css/`. The root `.` is always a directory.
#[derive(Clone, Default)]
pub struct MemorySource {
    files: Arc<RwLock<HashMap<String, Bytes>>>,
    reads: Arc<AtomicU64>,
    /// Simulate backend I/O errors if true
    simulate_io_error: Arc<AtomicBool>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_file(self, path: impl Into<String>, content: impl Into<Bytes>) -> Self {
        self.insert(path, content);
        self
    }

    /// Insert or replace a file.
    pub fn insert(&self, path: impl Into<String>, content: impl Into<Bytes>) {
        self.files.write().insert(path.into(), content.into());
    }

    /// Number of successful `read` calls served so far
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Make every `open` and `read` fail with a permission error
    pub fn set_io_error(&self, enabled: bool) {
        self.simulate_io_error.store(enabled, Ordering::Relaxed);
    }

    pub fn file_count(&self) -> usize {
        self.files.read().len()
    }

    fn check_io_error(&self, path: &str) -> Result<(), SourceError> {
        if self.simulate_io_error.load(Ordering::Relaxed) {
            return Err(SourceError::Io {
                path: path.to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "Simulated permission denied",
                ),
            });
        }
        Ok(())
    }

    fn is_dir(&self, path: &str) -> bool {
        if path == ROOT_PATH {
            return true;
        }
        let prefix = format!("{}/", path);
        self.files.read().keys().any(|k| k.starts_with(&prefix))
    }
}

#[async_trait]
impl AssetSource for MemorySource {
    async fn open(&self, path: &str) -> Result<AssetFile, SourceError> {
        let path = validate_path(path)?;
        self.check_io_error(path)?;

        if let Some(content) = self.files.read().get(path) {
            return Ok(AssetFile::from_bytes(content.clone()));
        }
        if self.is_dir(path) {
            return Ok(AssetFile::directory());
        }
        Err(SourceError::NotFound(path.to_string()))
    }

    async fn read(&self, path: &str) -> Result<Bytes, SourceError> {
        let path = validate_path(path)?;
        self.check_io_error(path)?;

        let content = self.files.read().get(path).cloned();
        match content {
            Some(content) => {
                self.reads.fetch_add(1, Ordering::Relaxed);
                Ok(content)
            }
            None if self.is_dir(path) => Err(SourceError::Io {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "is a directory"),
            }),
            None => Err(SourceError::NotFound(path.to_string())),
        }
    }
}
