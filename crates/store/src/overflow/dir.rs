//! Directory-backed overflow store

use super::OverflowStore;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use cellar_core::StoredKey;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

const PAYLOAD_EXTENSION: &str = "payload";

/// Overflow store keeping one file per key, written with tokio file I/O
#[derive(Debug, Clone)]
pub struct DirOverflowStore {
    dir: PathBuf,
}

impl DirOverflowStore {
    /// The directory is created on the first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn payload_path(&self, key: &StoredKey) -> PathBuf {
        self.dir.join(format!("{key}.{PAYLOAD_EXTENSION}"))
    }
}

#[async_trait]
impl OverflowStore for DirOverflowStore {
    async fn get(&self, key: &StoredKey) -> StoreResult<Option<String>> {
        let path = self.payload_path(key);
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, "read payload", e)),
        }
    }

    async fn put(&self, key: &StoredKey, value: &str) -> StoreResult<()> {
        let path = self.payload_path(key);
        let temp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4()));

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, "create overflow directory", e))?;

        if let Err(e) = fs::write(&temp_path, value).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StoreError::io(temp_path, "write payload", e));
        }

        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StoreError::io(path, "atomic rename", e));
        }

        tracing::trace!(path = %path.display(), bytes = value.len(), "wrote overflow payload");
        Ok(())
    }

    async fn remove(&self, key: &StoredKey) -> StoreResult<bool> {
        let path = self.payload_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(path, "remove payload", e)),
        }
    }
}
