//! Error types for the storage backends.

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`](super::KeyValueStore) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key cannot be mapped onto the backend (e.g. path separators).
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Reading or writing the backing medium failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded as JSON.
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
