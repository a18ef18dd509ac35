//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::analysis::AnalysisError;
use crate::core_state::CoreError;
use crate::har::HarError;
use crate::reason::ReasonError;
use crate::replay::ReplayError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("No candidates: {0}")]
    NoCandidates(String),
    #[error("Reasoning service unavailable: {0}")]
    ReasoningUnavailable(String),
    #[error("Upstream request failed: {0}")]
    UpstreamFailed(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone())
            }
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::NoCandidates(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "NO_CANDIDATES",
                detail.clone(),
            ),
            ApiError::ReasoningUnavailable(detail) => (
                StatusCode::BAD_GATEWAY,
                "REASONING_UNAVAILABLE",
                detail.clone(),
            ),
            ApiError::UpstreamFailed(detail) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_FAILED", detail.clone())
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
        }
    }
}

impl From<HarError> for ApiError {
    fn from(err: HarError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::NoCandidates => ApiError::NoCandidates(err.to_string()),
        }
    }
}

impl From<ReasonError> for ApiError {
    fn from(err: ReasonError) -> Self {
        ApiError::ReasoningUnavailable(err.to_string())
    }
}

impl From<ReplayError> for ApiError {
    fn from(err: ReplayError) -> Self {
        match err {
            ReplayError::InvalidCommand(_) | ReplayError::UnsupportedMethod(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ReplayError::Request(detail) => ApiError::UpstreamFailed(detail),
        }
    }
}
