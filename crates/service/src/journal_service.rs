use std::sync::Arc;

use chrono::{DateTime, Utc};
use inner_map_core::{InsightDraft, InsightRecord};
use inner_map_storage::SessionStore;

/// Journal reads and the save path that applies the first-milestone rule.
#[derive(Clone)]
pub struct JournalService {
    store: Arc<SessionStore>,
}

impl JournalService {
    #[must_use]
    pub const fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// All records, newest first.
    pub async fn list_sessions(&self) -> Vec<InsightRecord> {
        self.store.list_sessions().await
    }

    pub async fn get_session(&self, id: i64) -> Option<InsightRecord> {
        self.store.get_session(id).await
    }

    pub async fn is_empty(&self) -> bool {
        self.store.is_empty().await
    }

    /// Milestones only, oldest first.
    pub async fn evolution(&self) -> Vec<InsightRecord> {
        evolution_timeline(&self.store.list_sessions().await)
    }

    /// Stamp `draft` with `created_at` and persist it.
    ///
    /// The first record ever saved is always a milestone. A failed write is
    /// logged and the record is still returned for display.
    pub async fn record(&self, draft: InsightDraft, created_at: DateTime<Utc>) -> InsightRecord {
        let mut record = InsightRecord::from_draft(draft, created_at);
        match self.store.save_first_aware(&mut record).await {
            Ok(true) => {
                tracing::info!(id = record.id(), "first journal entry, marked as milestone");
            },
            Ok(false) => {},
            Err(e) => {
                tracing::error!(id = record.id(), error = %e, "failed to save journal entry");
                tracing::warn!(id = record.id(), "showing an insight that was not persisted");
            },
        }
        record
    }
}

/// Filter `records` to milestones sorted ascending by creation time.
#[must_use]
pub fn evolution_timeline(records: &[InsightRecord]) -> Vec<InsightRecord> {
    let mut milestones: Vec<InsightRecord> =
        records.iter().filter(|r| r.is_milestone).cloned().collect();
    milestones.sort_by_key(|r| r.created_at);
    milestones
}
