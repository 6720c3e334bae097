//! HTTP API server for inner-map.
//!
//! One journey per server: the browser front end reads `/api/state` and
//! drives the interview through the mutating routes. Mutations never wait
//! on each other; while one is in flight the rest get 409.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]
#![allow(clippy::single_call_fn, reason = "Helper functions improve readability")]

pub mod api_error;
mod handlers;
mod query_types;
mod response_types;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::Method,
    routing::{get, post, put},
};
use inner_map_service::{JournalService, Journey};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

pub use response_types::{StateResponse, VersionResponse};

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// The single journey this server drives. Handlers only ever `try_lock`.
    pub journey: Mutex<Journey>,
    /// Read-only journal access that does not contend with the journey.
    pub journal: JournalService,
}

impl AppState {
    #[must_use]
    pub fn new(journey: Journey, journal: JournalService) -> Self {
        Self { journey: Mutex::new(journey), journal }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/version", get(version))
        .route("/api/state", get(handlers::journey::get_state))
        .route("/api/journey/start", post(handlers::journey::start))
        .route("/api/interview/draft", put(handlers::journey::set_draft))
        .route("/api/interview/answer", post(handlers::journey::answer))
        .route("/api/interview/skip", post(handlers::journey::skip))
        .route("/api/interview/previous", post(handlers::journey::previous))
        .route("/api/interview/retry", post(handlers::journey::retry))
        .route("/api/interview/finish", post(handlers::journey::finish))
        .route("/api/sessions", get(handlers::journal::list_sessions))
        .route("/api/sessions/{created_at}", get(handlers::journal::get_session))
        .route("/api/sessions/{created_at}/open", post(handlers::journey::open_session))
        .route("/api/evolution", get(handlers::journal::evolution))
        .route("/api/dashboard", post(handlers::journey::open_dashboard))
        .route("/api/back", post(handlers::journey::back))
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
