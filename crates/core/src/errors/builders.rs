//! Builder methods for creating errors with context

use super::types::Error;
use crate::types::Tier;
use std::path::PathBuf;

// Helper methods for creating errors with context
impl Error {
    /// Create an encode error for the value at `path`
    #[must_use]
    pub fn encode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Encode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            key: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create a decode error with a source error
    #[must_use]
    pub fn decode_with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Decode {
            key: None,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create an overflow write error
    #[must_use]
    pub fn overflow_write(
        key: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let source = source.into();
        Error::OverflowWrite {
            key: key.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a storage error for a tier operation
    #[must_use]
    pub fn storage(
        tier: Tier,
        key: impl Into<String>,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Error::Storage {
            tier,
            key: key.into(),
            operation,
            message: message.into(),
        }
    }

    /// Create a missing overflow payload error
    #[must_use]
    pub fn missing_overflow_payload(key: impl Into<String>) -> Self {
        Error::MissingOverflowPayload { key: key.into() }
    }

    /// Create an invalid key error
    #[must_use]
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Attach the stored key to a decode error; other kinds pass through
    #[must_use]
    pub fn for_key(self, key: impl Into<String>) -> Self {
        match self {
            Error::Decode {
                key: None,
                message,
                source,
            } => Error::Decode {
                key: Some(key.into()),
                message,
                source,
            },
            other => other,
        }
    }

    /// Whether this error came from unreadable stored data
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode { .. } | Error::Json { .. })
    }
}
