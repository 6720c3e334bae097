//! Key-value persistence interface.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::StorageError;

/// Whole-value get/set storage. No partial updates, no queries.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

/// Process-local store, used by tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.entries.write().await.insert(key.to_owned(), value.to_vec());
        Ok(())
    }
}
