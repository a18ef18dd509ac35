//! Analyze endpoint: resolve a plain-language description against an
//! uploaded capture.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analysis::describe::{describe_api, ApiDescription};
use crate::analysis::gate::query_in_scope;
use crate::analysis::reconcile::{reconcile, reconcile_value};
use crate::analysis::selector::select_candidate;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::replay::curl::{curl_command, ReplayRequest};

/// Below this confidence the response carries a warning annotation.
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.4;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub session_id: Uuid,
    pub description: String,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curl_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_request: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_info: Option<ApiDescription>,
    pub confidence: f64,
    pub message: String,
    pub total_api_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// `POST /api/analyze` — find the captured request matching a description.
///
/// The whole pipeline (budget → gate → select → reconcile → describe)
/// runs inside one blocking task: the reasoning calls are blocking HTTP
/// with bounded timeouts, and within one analysis the stages are strictly
/// sequential anyway.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    if req.description.trim().is_empty() {
        return Err(ApiError::BadRequest("Description cannot be empty".into()));
    }

    let candidates = {
        let sessions = ctx.core.read_sessions()?;
        let session = sessions.get(&req.session_id).ok_or_else(|| {
            ApiError::NotFound("Session not found. Please upload a HAR file first.".into())
        })?;
        session.candidates.clone()
    };

    let total_api_count = candidates.len();
    tracing::info!(
        session_id = %req.session_id,
        candidates = total_api_count,
        "analyzing capture"
    );

    let reasoner = ctx.core.reasoner();
    let description = req.description;

    let response = tokio::task::spawn_blocking(move || -> Result<AnalyzeResponse, ApiError> {
        let budgeted = crate::har::budget::budget_candidates(&candidates);

        if !query_in_scope(reasoner.as_ref(), &candidates, &description) {
            return Ok(AnalyzeResponse {
                curl_command: None,
                api_request: None,
                api_info: None,
                confidence: 0.0,
                message: "The captured traffic does not appear to contain any API related to this request."
                    .into(),
                total_api_count,
                warnings: vec![],
            });
        }

        let selection = select_candidate(reasoner.as_ref(), &budgeted, &description)?;

        let matched = reconcile(&candidates, &selection.request).is_some();
        let api_request = reconcile_value(&candidates, &selection.request);

        let curl = ReplayRequest::try_from(&api_request)
            .ok()
            .map(|r| curl_command(&r));
        let api_info = describe_api(reasoner.as_ref(), &api_request);

        let mut warnings = Vec::new();
        if selection.confidence < LOW_CONFIDENCE_THRESHOLD {
            warnings.push(format!(
                "Low confidence match ({:.2}); the selected request may not be what you are looking for.",
                selection.confidence
            ));
        }
        if !matched {
            warnings.push(
                "The selected request could not be matched back to the capture; headers and body may be incomplete."
                    .into(),
            );
        }

        Ok(AnalyzeResponse {
            curl_command: curl,
            api_request: Some(api_request),
            api_info: Some(api_info),
            confidence: selection.confidence,
            message: "API request identified successfully".into(),
            total_api_count,
            warnings,
        })
    })
    .await
    .map_err(|e| ApiError::Internal(format!("analysis task failed: {e}")))??;

    Ok(Json(response))
}
