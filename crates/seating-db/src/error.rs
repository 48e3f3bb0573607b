//! Error types for the persistence layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! I/O and JSON errors. Callers that need the key log it alongside.

/// Errors that can occur in the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A filesystem operation failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A key contains characters that cannot be used as a file name.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}
