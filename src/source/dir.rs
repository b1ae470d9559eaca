//! Directory-backed asset source using tokio::fs

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

use super::{validate_path, AssetFile, AssetSource, ROOT_PATH};
use crate::error::SourceError;

/// Source that serves files below a root directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a validated virtual path onto the filesystem
    fn full_path(&self, path: &str) -> PathBuf {
        if path == ROOT_PATH {
            return self.root.clone();
        }
        path.split('/')
            .fold(self.root.clone(), |acc, elem| acc.join(elem))
    }
}

#[async_trait]
impl AssetSource for DirSource {
    async fn open(&self, path: &str) -> Result<AssetFile, SourceError> {
        let path = validate_path(path)?;
        let full = self.full_path(path);

        let metadata = tokio::fs::metadata(&full)
            .await
            .map_err(|e| SourceError::from_io(path, e))?;
        if metadata.is_dir() {
            return Ok(AssetFile::directory());
        }

        let file = tokio::fs::File::open(&full)
            .await
            .map_err(|e| SourceError::from_io(path, e))?;
        Ok(AssetFile::from_file(file, metadata.len()))
    }

    async fn read(&self, path: &str) -> Result<Bytes, SourceError> {
        let path = validate_path(path)?;
        let data = tokio::fs::read(self.full_path(path))
            .await
            .map_err(|e| SourceError::from_io(path, e))?;
        Ok(Bytes::from(data))
    }
}
