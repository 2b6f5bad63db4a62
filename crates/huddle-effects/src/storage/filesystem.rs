//! Filesystem-based storage handler
//!
//! Stores each bucket as a `.json` file under a base directory. Suitable
//! for a single local replica: writes are whole-file replacements, reads
//! are whole-file loads, and there is no cross-file coordination.

use async_trait::async_trait;
use huddle_core::{StorageEffects, StorageError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Filesystem-backed storage handler.
#[derive(Debug, Clone)]
pub struct FilesystemStorageHandler {
    /// Base directory for bucket files
    base_path: PathBuf,
}

impl FilesystemStorageHandler {
    /// Create a handler rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Base directory this handler writes under.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{key}.json"))
    }

    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey {
                reason: "key cannot be empty".to_string(),
            });
        }
        // Bucket names are flat; path separators would escape the base dir.
        if key.contains('/') || key.contains('\\') || key.contains("..") {
            return Err(StorageError::InvalidKey {
                reason: format!("key {key:?} contains path components"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StorageEffects for FilesystemStorageHandler {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        Self::validate_key(key)?;

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("failed to create directory: {e}")))?;

        fs::write(self.file_path(key), value)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("failed to write file: {e}")))?;

        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Self::validate_key(key)?;

        match fs::read(self.file_path(key)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed(format!("failed to read file: {e}"))),
        }
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        Self::validate_key(key)?;

        match fs::remove_file(self.file_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "failed to remove file: {e}"
            ))),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Self::validate_key(key)?;
        Ok(self.file_path(key).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_retrieve_remove() {
        let temp_dir = TempDir::new().unwrap();
        let handler = FilesystemStorageHandler::new(temp_dir.path());

        let key = "feed-state";
        let value = br#"{"posts":[]}"#.to_vec();

        handler.store(key, value.clone()).await.unwrap();
        assert_eq!(handler.retrieve(key).await.unwrap(), Some(value));
        assert!(handler.exists(key).await.unwrap());

        assert!(handler.remove(key).await.unwrap());
        assert!(!handler.exists(key).await.unwrap());
        assert_eq!(handler.retrieve(key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_key_reads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let handler = FilesystemStorageHandler::new(temp_dir.path());

        assert_eq!(handler.retrieve("never-written").await.unwrap(), None);
        assert!(!handler.remove("never-written").await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_path_escaping_keys() {
        let temp_dir = TempDir::new().unwrap();
        let handler = FilesystemStorageHandler::new(temp_dir.path());

        assert!(handler.store("", b"x".to_vec()).await.is_err());
        assert!(handler.store("../escape", b"x".to_vec()).await.is_err());
        assert!(handler.retrieve("a/b").await.is_err());
    }

    #[tokio::test]
    async fn test_overwrites_previous_value() {
        let temp_dir = TempDir::new().unwrap();
        let handler = FilesystemStorageHandler::new(temp_dir.path());

        handler.store("bucket", b"first".to_vec()).await.unwrap();
        handler.store("bucket", b"second".to_vec()).await.unwrap();
        assert_eq!(
            handler.retrieve("bucket").await.unwrap(),
            Some(b"second".to_vec())
        );
    }
}
