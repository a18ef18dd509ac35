//! Liveness endpoints.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config;

#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// `GET /` — human-readable liveness check.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} backend is running", config::APP_NAME),
    })
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub active_sessions: usize,
}

/// `GET /health` — machine-readable health check.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let active_sessions = ctx.core.read_sessions()?.len();
    Ok(Json(HealthResponse {
        status: "ok",
        version: config::APP_VERSION,
        active_sessions,
    }))
}
