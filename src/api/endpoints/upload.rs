//! Capture upload endpoint.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::har::extract::extract_candidates;

#[derive(Serialize)]
pub struct UploadResponse {
    pub session_id: uuid::Uuid,
    pub message: &'static str,
    pub api_count: usize,
}

/// `POST /api/upload` — multipart upload of a `.har` capture.
///
/// Extraction runs off the async runtime; large captures are pure CPU
/// work. Returns the session ID to pass to `/api/analyze`.
pub async fn upload_har(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file_bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        if !file_name.to_lowercase().ends_with(".har") {
            return Err(ApiError::BadRequest("File must be a .har file".into()));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
        file_bytes = Some(bytes);
    }

    let bytes = file_bytes
        .ok_or_else(|| ApiError::BadRequest("Missing 'file' field in upload".into()))?;

    let candidates = tokio::task::spawn_blocking(move || extract_candidates(&bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("extraction task failed: {e}")))??;

    let api_count = candidates.len();
    let session_id = ctx.core.write_sessions()?.insert(candidates);

    tracing::info!(%session_id, api_count, "capture processed");

    Ok(Json(UploadResponse {
        session_id,
        message: "HAR file processed successfully",
        api_count,
    }))
}
