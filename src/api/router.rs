//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`; CORS is permissive because the
//! browser frontend is served from a different origin.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Captures from busy sites run tens of megabytes.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    let api = Router::new()
        .route("/upload", post(endpoints::upload::upload_har))
        .route("/analyze", post(endpoints::analyze::analyze))
        .route("/test", post(endpoints::replay::test_command))
        .route("/interpret", post(endpoints::replay::interpret))
        .with_state(ctx.clone());

    Router::new()
        .route("/", get(endpoints::health::root))
        .route("/health", get(endpoints::health::check))
        .with_state(ctx)
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
}
