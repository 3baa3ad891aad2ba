//! Tier-2 overflow stores
//!
//! The overflow tier is asynchronous and has no practical capacity limit.
//! It only ever holds values the primary tier rejected for size.

mod dir;
mod memory;

pub use dir::DirOverflowStore;
pub use memory::MemoryOverflowStore;

use crate::error::StoreResult;
use async_trait::async_trait;
use cellar_core::StoredKey;

/// Asynchronous key/value store backing the primary tier
#[async_trait]
pub trait OverflowStore: Send + Sync {
    async fn get(&self, key: &StoredKey) -> StoreResult<Option<String>>;

    async fn put(&self, key: &StoredKey, value: &str) -> StoreResult<()>;

    /// Returns whether a payload was removed
    async fn remove(&self, key: &StoredKey) -> StoreResult<bool>;
}
