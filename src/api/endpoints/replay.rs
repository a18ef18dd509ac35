//! Replay endpoints: run a generated curl command and explain its output.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analysis::interpret::interpret_response;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::replay::curl::parse_curl_command;
use crate::replay::execute::execute;

#[derive(Deserialize)]
pub struct TestRequest {
    pub curl_command: String,
}

#[derive(Serialize)]
pub struct TestResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub response: String,
}

/// `POST /api/test` — execute a curl command and return the response.
pub async fn test_command(
    Json(req): Json<TestRequest>,
) -> Result<Json<TestResponse>, ApiError> {
    let parsed = parse_curl_command(&req.curl_command)?;
    tracing::info!(method = %parsed.method, url = %parsed.url, "replaying request");

    let outcome = execute(&parsed).await?;
    Ok(Json(TestResponse {
        status_code: outcome.status_code,
        headers: outcome.headers,
        response: outcome.response,
    }))
}

#[derive(Deserialize)]
pub struct InterpretRequest {
    pub api_response: String,
    pub api_description: String,
}

#[derive(Serialize)]
pub struct InterpretResponse {
    pub interpretation: String,
}

/// `POST /api/interpret` — explain an API response in plain language.
pub async fn interpret(
    State(ctx): State<ApiContext>,
    Json(req): Json<InterpretRequest>,
) -> Result<Json<InterpretResponse>, ApiError> {
    let reasoner = ctx.core.reasoner();
    let interpretation = tokio::task::spawn_blocking(move || {
        interpret_response(reasoner.as_ref(), &req.api_response, &req.api_description)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("interpretation task failed: {e}")))??;

    Ok(Json(InterpretResponse { interpretation }))
}
