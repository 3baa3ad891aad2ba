//! Core error type definitions

use crate::types::Tier;
use std::path::PathBuf;

/// Result type alias for cellar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cellar operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The value holds something without a data representation (callables, host handles)
    #[error("cannot encode value at '{path}': {message}")]
    Encode { path: String, message: String },

    /// Stored text is not valid JSON, or a compressed payload is corrupt
    #[error(
        "failed to decode{}: {message}",
        .key.as_ref().map(|k| format!(" '{k}'")).unwrap_or_default()
    )]
    Decode {
        key: Option<String>,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The overflow tier rejected a write; there is no further tier to fall back to
    #[error("overflow store rejected write for '{key}': {message}")]
    OverflowWrite {
        key: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A tier failed for a reason other than capacity
    #[error("{tier} {operation} failed for '{key}': {message}")]
    Storage {
        tier: Tier,
        key: String,
        operation: &'static str,
        message: String,
    },

    /// The primary tier holds the overflow sentinel but the overflow tier has no payload
    #[error("key '{key}' points at the overflow store but no payload was found there")]
    MissingOverflowPayload { key: String },

    /// Stored key validation errors
    #[error("invalid stored key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{}': {source}", .path.display())]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}
