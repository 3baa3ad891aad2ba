//! In-memory overflow store

use super::OverflowStore;
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use cellar_core::StoredKey;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Overflow store kept in process memory.
///
/// Writes can be switched to fail, and reads are counted, so callers can
/// observe how the gateway uses the tier.
#[derive(Debug, Default)]
pub struct MemoryOverflowStore {
    entries: RwLock<HashMap<StoredKey, String>>,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
}

impl MemoryOverflowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` and `remove` fail until switched back
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `get` calls served so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub async fn contains(&self, key: &StoredKey) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn check_writable(&self, key: &StoredKey) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(format!(
                "writes are disabled (key '{key}')"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl OverflowStore for MemoryOverflowStore {
    async fn get(&self, key: &StoredKey) -> StoreResult<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &StoredKey, value: &str) -> StoreResult<()> {
        self.check_writable(key)?;
        self.entries
            .write()
            .await
            .insert(key.clone(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &StoredKey) -> StoreResult<bool> {
        self.check_writable(key)?;
        Ok(self.entries.write().await.remove(key).is_some())
    }
}
