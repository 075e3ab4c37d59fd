//! Error types for the storage layer.

use thiserror::Error;

/// Failures of the underlying key-value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Embedded database error (open, read, write or flush).
    #[error("database error: {0}")]
    Database(#[from] sled::Error),

    /// Stored bytes are not valid UTF-8.
    #[error("value at '{key}' is not valid UTF-8")]
    InvalidUtf8 { key: String },

    /// Backend refuses writes (quota exceeded, read-only, disabled).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failures while turning values into stored text and back.
#[derive(Debug, Error)]
pub enum CodecError {
    /// JSON (de)serialization failed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
