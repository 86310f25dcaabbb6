//! A filesystem-backed [`Storage`] implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::Storage;

/// Maps blob keys to paths under a configured root directory; `/` in a key
/// becomes a path separator.
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    pub fn new(root: impl Into<PathBuf>) -> FilesystemStore {
        FilesystemStore { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in key.split('/') {
            path.push(segment);
        }
        path
    }

    async fn ensure_parent(path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FilesystemStore {
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(tokio::fs::metadata(self.path_for(key)).await.is_ok())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    /// Writes via a temp-file-then-rename within the same directory, so a
    /// crash mid-write cannot leave a half-written file visible at `key`.
    async fn put(&self, key: &str, value: Bytes) -> Result<(), StorageError> {
        let path = self.path_for(key);
        Self::ensure_parent(&path).await?;

        let tmp_name = format!(".tmp-{}", Uuid::new_v4());
        let tmp_path = path
            .parent()
            .map(|p| p.join(&tmp_name))
            .unwrap_or_else(|| PathBuf::from(&tmp_name));

        tokio::fs::write(&tmp_path, &value)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut out = Vec::new();
        let base = self.path_for(prefix);
        if tokio::fs::metadata(&base).await.is_err() {
            return Ok(out);
        }
        let mut stack = vec![base.clone()];
        while let Some(dir) = stack.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?
            {
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| StorageError::Io(e.to_string()))?;
                if file_type.is_dir() {
                    stack.push(path);
                } else {
                    let relative = path
                        .strip_prefix(&self.root)
                        .unwrap_or(&path)
                        .to_string_lossy()
                        .replace(std::path::MAIN_SEPARATOR, "/");
                    out.push(relative);
                }
            }
        }
        Ok(out)
    }

    /// Renames where possible; falls back to copy-then-remove across
    /// filesystems/volumes where a direct rename isn't possible.
    async fn move_key(&self, src: &str, dst: &str) -> Result<(), StorageError> {
        let src_path = self.path_for(src);
        let dst_path = self.path_for(dst);
        Self::ensure_parent(&dst_path).await?;

        match tokio::fs::rename(&src_path, &dst_path).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::debug!(src, dst, error = %e, "rename failed, falling back to copy+remove");
                tokio::fs::copy(&src_path, &dst_path)
                    .await
                    .map_err(|e| StorageError::Io(e.to_string()))?;
                tokio::fs::remove_file(&src_path)
                    .await
                    .map_err(|e| StorageError::Io(e.to_string()))?;
                Ok(())
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}
