//! Media storage seam.
//!
//! Handlers hand fully-read upload bytes to a [`MediaStorage`] and persist the
//! returned URL. [`LocalMediaStorage`] keeps files on local disk; an object
//! store implementation plugs in behind the same trait.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::error::CoreError;

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `bytes` under `key` and return the public URL for it.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, CoreError>;

    /// Remove the object stored under `key`. Missing objects are not an error.
    async fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// Stores media files below a root directory.
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `key` below the root, refusing absolute paths and `..`.
    fn path_for(&self, key: &str) -> Result<PathBuf, CoreError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(CoreError::Validation(format!("Invalid media key '{key}'")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, CoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::Internal(format!("Failed to create media dir: {e}")))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to write media file: {e}")))?;

        tracing::debug!(key, size = bytes.len(), "Stored media file");
        Ok(format!("{}/{key}", self.base_url))
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Internal(format!(
                "Failed to remove media file: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn put_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path(), "http://localhost:3000/media/");

        let url = storage.put("audio/one.mp3", b"ID3").await.unwrap();
        assert_eq!(url, "http://localhost:3000/media/audio/one.mp3");

        let written = tokio::fs::read(dir.path().join("audio/one.mp3")).await.unwrap();
        assert_eq!(written, b"ID3");
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path(), "/media");

        storage.put("pictures/a.png", b"png").await.unwrap();
        storage.remove("pictures/a.png").await.unwrap();
        storage.remove("pictures/a.png").await.unwrap();
        assert!(!dir.path().join("pictures/a.png").exists());
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalMediaStorage::new(dir.path(), "/media");

        assert_matches!(
            storage.put("../escape.mp3", b"x").await,
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            storage.put("/etc/passwd", b"x").await,
            Err(CoreError::Validation(_))
        );
        assert_matches!(storage.put("", b"x").await, Err(CoreError::Validation(_)));
    }
}
