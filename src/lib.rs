pub mod analysis; // gate → select → reconcile → describe
pub mod api;
pub mod config;
pub mod core_state;
pub mod har; // capture ingestion: classify → extract → budget
pub mod reason; // reasoning boundary (Ollama)
pub mod replay; // curl formatting, parsing and execution
pub mod session_store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Build state, start the runtime, serve the API until shutdown.
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = config::Settings::from_env();
    tracing::info!(
        ollama_url = %settings.ollama_url,
        model = %settings.ollama_model,
        "reasoning backend configured"
    );

    // The blocking reasoning client must be built before the async
    // runtime exists.
    let reasoner = Arc::new(reason::ollama::OllamaReasoner::from_settings(&settings));
    let core = Arc::new(core_state::CoreState::new(settings, reasoner));

    let runtime = tokio::runtime::Runtime::new().expect("failed to start async runtime");
    runtime.block_on(serve(core));
}

async fn serve(core: Arc<core_state::CoreState>) {
    let addr = core.settings.bind_addr();
    let app = api::api_router(Arc::clone(&core));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind API listener");
    tracing::info!(%addr, "API listening");

    axum::serve(listener, app).await.expect("API server error");
}
