use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use inner_map_service::{Journey, JourneySnapshot};
use tokio::sync::MutexGuard;

use crate::AppState;
use crate::api_error::ApiError;
use crate::query_types::{
    AnswerRequest, DashboardRequest, DraftRequest, FinishRequest, PreviousRequest,
};
use crate::response_types::StateResponse;

type SnapshotResult = Result<Json<JourneySnapshot>, ApiError>;

fn claim(state: &AppState) -> Result<MutexGuard<'_, Journey>, ApiError> {
    state.journey.try_lock().map_err(|_| ApiError::busy())
}

pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let journey = state.journey.try_lock().ok().map(|j| j.snapshot());
    Json(StateResponse { busy: journey.is_none(), journey })
}

pub async fn start(State(state): State<Arc<AppState>>) -> SnapshotResult {
    let mut journey = claim(&state)?;
    journey.start().await?;
    Ok(Json(journey.snapshot()))
}

pub async fn set_draft(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DraftRequest>,
) -> SnapshotResult {
    let mut journey = claim(&state)?;
    journey.set_draft(req.draft)?;
    Ok(Json(journey.snapshot()))
}

pub async fn answer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnswerRequest>,
) -> SnapshotResult {
    let mut journey = claim(&state)?;
    journey.answer(&req.answer).await?;
    Ok(Json(journey.snapshot()))
}

pub async fn skip(State(state): State<Arc<AppState>>) -> SnapshotResult {
    let mut journey = claim(&state)?;
    journey.skip().await?;
    Ok(Json(journey.snapshot()))
}

pub async fn previous(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PreviousRequest>,
) -> SnapshotResult {
    let mut journey = claim(&state)?;
    journey.previous(req.draft)?;
    Ok(Json(journey.snapshot()))
}

pub async fn retry(State(state): State<Arc<AppState>>) -> SnapshotResult {
    let mut journey = claim(&state)?;
    journey.retry().await?;
    Ok(Json(journey.snapshot()))
}

pub async fn finish(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FinishRequest>,
) -> SnapshotResult {
    let mut journey = claim(&state)?;
    let record = journey.finish(req.answer.as_deref()).await?;
    tracing::info!(id = record.id(), milestone = record.is_milestone, "journey finished");
    Ok(Json(journey.snapshot()))
}

pub async fn open_session(
    State(state): State<Arc<AppState>>,
    Path(created_at): Path<i64>,
) -> SnapshotResult {
    let mut journey = claim(&state)?;
    journey.select_entry(created_at).await?;
    Ok(Json(journey.snapshot()))
}

pub async fn open_dashboard(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DashboardRequest>,
) -> SnapshotResult {
    let mut journey = claim(&state)?;
    journey.open_dashboard(req.tab)?;
    Ok(Json(journey.snapshot()))
}

pub async fn back(State(state): State<Arc<AppState>>) -> SnapshotResult {
    let mut journey = claim(&state)?;
    journey.back()?;
    Ok(Json(journey.snapshot()))
}
