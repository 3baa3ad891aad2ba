//! Primary (tier 1) key-value stores
//!
//! The primary tier is synchronous and size-constrained. When a value does not
//! fit it must answer with [`StoreError::CapacityExceeded`] and leave whatever
//! was stored under the key untouched.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreResult;
use cellar_core::StoredKey;

/// Bytes used and allowed in a primary store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreUsage {
    pub used_bytes: u64,
    pub quota_bytes: u64,
}

impl StoreUsage {
    pub fn available_bytes(&self) -> u64 {
        self.quota_bytes.saturating_sub(self.used_bytes)
    }
}

/// Synchronous, quota-bounded key-value store
pub trait PrimaryStore: Send + Sync {
    fn get(&self, key: &StoredKey) -> StoreResult<Option<String>>;

    /// Replace the value under `key`; fails with `CapacityExceeded` when it does not fit
    fn set(&self, key: &StoredKey, value: &str) -> StoreResult<()>;

    /// Returns whether a value was removed
    fn remove(&self, key: &StoredKey) -> StoreResult<bool>;

    fn usage(&self) -> StoreResult<StoreUsage>;
}

/// Size a key/value pair is charged against the quota
pub(crate) fn entry_cost(key: &StoredKey, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}
