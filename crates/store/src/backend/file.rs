//! Directory-backed primary store
//!
//! One file per key under the store directory. Writes go through a temporary
//! file and an atomic rename, so a crash never leaves a half-written value.

use super::{entry_cost, PrimaryStore, StoreUsage};
use crate::error::{StoreError, StoreResult};
use cellar_core::StoredKey;
use cellar_utils::atomic_file::write_atomic_string;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const ENTRY_EXTENSION: &str = "entry";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    quota_bytes: u64,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>, quota_bytes: u64) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, "create store directory", e))?;
        Ok(Self { dir, quota_bytes })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &StoredKey) -> PathBuf {
        self.dir.join(format!("{key}.{ENTRY_EXTENSION}"))
    }

    /// Charged bytes of every entry, optionally ignoring one key
    fn used_bytes(&self, except: Option<&StoredKey>) -> StoreResult<u64> {
        let read_dir =
            fs::read_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, "list store directory", e))?;

        let mut used = 0;
        for entry in read_dir {
            let entry = entry.map_err(|e| StoreError::io(&self.dir, "list store directory", e))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if except.is_some_and(|key| key.as_str() == stem) {
                continue;
            }
            let metadata = entry
                .metadata()
                .map_err(|e| StoreError::io(&path, "stat entry", e))?;
            if metadata.is_file() {
                used += stem.len() as u64 + metadata.len();
            }
        }
        Ok(used)
    }
}

impl PrimaryStore for FileStore {
    fn get(&self, key: &StoredKey) -> StoreResult<Option<String>> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, "read entry", e)),
        }
    }

    fn set(&self, key: &StoredKey, value: &str) -> StoreResult<()> {
        let available = self
            .quota_bytes
            .saturating_sub(self.used_bytes(Some(key))?);
        let requested = entry_cost(key, value);
        if requested > available {
            return Err(StoreError::CapacityExceeded {
                key: key.to_string(),
                requested_bytes: requested,
                available_bytes: available,
            });
        }

        write_atomic_string(&self.entry_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &StoredKey) -> StoreResult<bool> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(path, "remove entry", e)),
        }
    }

    fn usage(&self) -> StoreResult<StoreUsage> {
        Ok(StoreUsage {
            used_bytes: self.used_bytes(None)?,
            quota_bytes: self.quota_bytes,
        })
    }
}
