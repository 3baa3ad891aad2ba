//! Persistence core for cellar
//!
//! This crate stores whole collections of records under [`StoredKey`]s:
//! - [`codec`]: adaptive dictionary (LZW) compression over text
//! - [`serialization`]: JSON encoding with date type stamps and cycle markers
//! - [`envelope`]: compress-on-write policy around encoded values
//! - [`backend`]: the synchronous, quota-bounded primary tier
//! - [`overflow`]: the asynchronous overflow tier
//! - [`gateway`]: routing between the tiers, the only entry point callers need
//! - [`validation`]: dropping malformed records from decoded collections
//!
//! [`StoredKey`]: cellar_core::StoredKey

pub mod backend;
pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod overflow;
pub mod serialization;
pub mod validation;

pub use backend::{FileStore, MemoryStore, PrimaryStore, StoreUsage};
pub use config::{
    ConfigSource, StoreConfig, StoreConfigBuilder, StoreConfigLoader, StoreConfiguration,
};
pub use envelope::Envelope;
pub use error::{StoreError, StoreResult};
pub use gateway::StorageGateway;
pub use overflow::{DirOverflowStore, MemoryOverflowStore, OverflowStore};
pub use validation::{validate_collection, ValidatedCollection};

/// Gateway over on-disk tiers, as used by the command line tool
pub type FileGateway = StorageGateway<FileStore, DirOverflowStore>;

/// Open the on-disk gateway described by `config`
pub fn open_file_gateway(config: &StoreConfig) -> cellar_core::Result<FileGateway> {
    config.validate()?;
    let primary = FileStore::open(config.primary_dir(), config.primary_quota_bytes).map_err(|e| {
        cellar_core::Error::storage(cellar_core::Tier::Primary, "*", "open", e.to_string())
    })?;
    let overflow = DirOverflowStore::new(config.overflow_dir());
    Ok(StorageGateway::with_config(primary, overflow, config))
}
