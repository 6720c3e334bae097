//! Journal persistence: every insight record serialized as one JSON array
//! under a single key.

use std::sync::Arc;

use inner_map_core::{InsightRecord, JOURNAL_KEY};
use tokio::sync::Mutex;

use crate::{KeyValueStore, StorageError};

pub struct SessionStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    /// Serializes read-modify-write cycles within this process. Separate
    /// processes sharing the backing store still race, last writer wins.
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("key", &self.key).finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(kv, JOURNAL_KEY)
    }

    #[must_use]
    pub fn with_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { kv, key: key.into(), write_lock: Mutex::new(()) }
    }

    async fn load(&self) -> Result<Vec<InsightRecord>, StorageError> {
        let Some(bytes) = self.kv.get(&self.key).await? else {
            return Ok(Vec::new());
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// All records, newest first.
    ///
    /// A missing, unreadable or corrupt journal reads as empty.
    pub async fn list_sessions(&self) -> Vec<InsightRecord> {
        match self.load().await {
            Ok(mut records) => {
                records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                records
            },
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "journal unreadable, treating as empty");
                Vec::new()
            },
        }
    }

    /// Look up a record by its millisecond `created_at`.
    pub async fn get_session(&self, id: i64) -> Option<InsightRecord> {
        self.list_sessions().await.into_iter().find(|r| r.id() == id)
    }

    pub async fn is_empty(&self) -> bool {
        self.list_sessions().await.is_empty()
    }

    /// Prepend `record` and write the whole journal back in a single write.
    ///
    /// # Errors
    /// Returns the underlying `StorageError` if the existing journal cannot
    /// be read or parsed, or if serialization or the write fails. A journal
    /// that fails to parse is left untouched.
    pub async fn try_save_session(&self, record: &InsightRecord) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let existing = self.load().await?;
        self.prepend(record, existing).await
    }

    /// Save `record`, first marking it as the first-ever milestone when the
    /// journal is empty. The emptiness check and the write happen under the
    /// same lock. Returns whether the record was the first entry.
    ///
    /// # Errors
    /// Same as [`Self::try_save_session`]. On error `record` is left unmarked.
    pub async fn save_first_aware(&self, record: &mut InsightRecord) -> Result<bool, StorageError> {
        let _guard = self.write_lock.lock().await;
        let existing = self.load().await?;
        let first = existing.is_empty();
        let mut candidate = record.clone();
        if first {
            candidate.mark_first_milestone();
        }
        self.prepend(&candidate, existing).await?;
        *record = candidate;
        Ok(first)
    }

    async fn prepend(
        &self,
        record: &InsightRecord,
        existing: Vec<InsightRecord>,
    ) -> Result<(), StorageError> {
        let mut records = Vec::with_capacity(existing.len().saturating_add(1));
        records.push(record.clone());
        records.extend(existing);
        let bytes = serde_json::to_vec(&records)?;
        self.kv.set(&self.key, &bytes).await?;
        tracing::info!(id = record.id(), total = records.len(), "saved journal entry");
        Ok(())
    }

    /// Like [`Self::try_save_session`] but logs and swallows failures.
    /// Returns whether the record was persisted.
    pub async fn save_session(&self, record: &InsightRecord) -> bool {
        match self.try_save_session(record).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(id = record.id(), error = %e, "failed to save journal entry");
                false
            },
        }
    }
}
