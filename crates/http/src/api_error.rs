//! Typed API error for HTTP handlers.
//!
//! Converts service errors into JSON responses of the form
//! `{"error": "message"}` with a matching status code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inner_map_core::SYNTHESIS_FAILED_MESSAGE;
use inner_map_service::{FlowError, ServiceError};

#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found: requested journal entry doesn't exist.
    NotFound(String),
    /// 409 Conflict: the journey is busy or the action does not fit its
    /// current state.
    Conflict(String),
    /// 502 Bad Gateway: the provider failed or answered with a malformed
    /// insight. Details logged, not exposed.
    BadGateway(String),
}

impl ApiError {
    pub fn busy() -> Self {
        Self::Conflict("another request is in progress".to_owned())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Provider(ref e) | ServiceError::Synthesis(ref e) => {
                tracing::error!(error = %e, "provider call failed");
                Self::BadGateway(SYNTHESIS_FAILED_MESSAGE.to_owned())
            },
            ServiceError::Flow(FlowError::Busy) => Self::busy(),
            ServiceError::NotFound(msg) => Self::NotFound(msg),
            ServiceError::Flow(_) | ServiceError::InvalidTransition(_) | ServiceError::NoInterview => {
                Self::Conflict(err.to_string())
            },
        }
    }
}
