//! Tier-level store errors
//!
//! Stores report failures with [`StoreError`]. The gateway turns them into
//! [`cellar_core::Error`]s, except for [`StoreError::CapacityExceeded`] from
//! the primary tier, which only redirects the write to the overflow tier.

use std::path::PathBuf;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store cannot hold the value; distinguishable from every other failure
    #[error(
        "quota exceeded writing '{key}': requested {requested_bytes} bytes, only {available_bytes} bytes available"
    )]
    CapacityExceeded {
        key: String,
        requested_bytes: u64,
        available_bytes: u64,
    },

    /// I/O errors from file-backed stores
    #[error("I/O error during {operation} on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// The store refused the operation for another reason
    #[error("store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, operation: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        StoreError::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_capacity(&self) -> bool {
        matches!(self, StoreError::CapacityExceeded { .. })
    }
}

impl From<cellar_core::Error> for StoreError {
    fn from(error: cellar_core::Error) -> Self {
        match error {
            cellar_core::Error::FileSystem {
                path,
                operation,
                source,
            } => StoreError::Io {
                path,
                operation,
                source,
            },
            other => StoreError::Unavailable {
                reason: other.to_string(),
            },
        }
    }
}
