//! Typed error enum for the storage layer.

use thiserror::Error;

/// Storage-layer error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored bytes could not be deserialized into domain types.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Key is not usable as a storage location.
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::DataCorruption {
            context: "JSON serialization/deserialization".to_owned(),
            source: Box::new(err),
        }
    }
}
