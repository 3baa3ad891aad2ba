//! In-memory primary store with a byte quota

use super::{entry_cost, PrimaryStore, StoreUsage};
use crate::error::{StoreError, StoreResult};
use cellar_core::{StoredKey, DEFAULT_PRIMARY_QUOTA_BYTES};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Quota-bounded map; every entry costs its key length plus value length
#[derive(Debug)]
pub struct MemoryStore {
    quota_bytes: u64,
    entries: RwLock<HashMap<StoredKey, String>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_quota(DEFAULT_PRIMARY_QUOTA_BYTES)
    }
}

impl MemoryStore {
    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            quota_bytes,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl PrimaryStore for MemoryStore {
    fn get(&self, key: &StoredKey) -> StoreResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &StoredKey, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write();
        let used: u64 = entries.iter().map(|(k, v)| entry_cost(k, v)).sum();
        let replaced = entries.get(key).map_or(0, |v| entry_cost(key, v));
        let available = self.quota_bytes.saturating_sub(used - replaced);
        let requested = entry_cost(key, value);

        if requested > available {
            return Err(StoreError::CapacityExceeded {
                key: key.to_string(),
                requested_bytes: requested,
                available_bytes: available,
            });
        }
        entries.insert(key.clone(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &StoredKey) -> StoreResult<bool> {
        Ok(self.entries.write().remove(key).is_some())
    }

    fn usage(&self) -> StoreResult<StoreUsage> {
        let used_bytes = self
            .entries
            .read()
            .iter()
            .map(|(k, v)| entry_cost(k, v))
            .sum();
        Ok(StoreUsage {
            used_bytes,
            quota_bytes: self.quota_bytes,
        })
    }
}
