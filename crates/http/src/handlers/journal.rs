use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use inner_map_core::InsightRecord;

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::SessionsQuery;

/// Journal entries, newest first.
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionsQuery>,
) -> Json<Vec<InsightRecord>> {
    let mut records = state.journal.list_sessions().await;
    if let Some(limit) = query.limit {
        records.truncate(limit);
    }
    Json(records)
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(created_at): Path<i64>,
) -> Result<Json<InsightRecord>, ApiError> {
    state
        .journal
        .get_session(created_at)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("journal entry {created_at} not found")))
}

/// Milestones, oldest first.
pub async fn evolution(State(state): State<Arc<AppState>>) -> Json<Vec<InsightRecord>> {
    Json(state.journal.evolution().await)
}
