//! Viva server library logic.
//!
//! Relays a live interview between a browser and a workflow engine: the
//! engine pushes questions over HTTP, the relay delivers them to the session's
//! WebSocket, and transcribed answers coming back over that socket are
//! forwarded to the engine's resume URL.

pub mod api;
pub mod api_gladia;
pub mod api_heygen;
pub mod api_interview;
pub mod api_ws;
pub mod config;
pub mod forward;
pub mod registry;
pub mod relay;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use config::Config;
use forward::AnswerForwarder;
use registry::SessionRegistry;
use relay::ConnectionRelay;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use viva_providers::{GladiaClient, HeyGenClient, ProviderError, WorkflowClient};

/// Application state shared across all request handlers and sockets.
#[derive(Clone)]
pub struct AppState {
    /// Open interview sessions and their resume URLs.
    pub sessions: SessionRegistry,
    /// Session → WebSocket bindings.
    pub relay: ConnectionRelay,
    /// Sends answers to the workflow engine.
    pub forwarder: AnswerForwarder,
    /// Workflow engine client.
    pub workflow: Arc<WorkflowClient>,
    /// Live transcription provider client.
    pub gladia: Arc<GladiaClient>,
    /// Avatar streaming provider client.
    pub heygen: Arc<HeyGenClient>,
    /// Directory of browser assets.
    pub static_dir: String,
}

impl AppState {
    /// Builds fresh, empty stores and provider clients from configuration.
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let sessions = SessionRegistry::new();
        let workflow = Arc::new(WorkflowClient::new(config.workflow.clone())?);
        Ok(Self {
            forwarder: AnswerForwarder::new(sessions.clone(), workflow.clone()),
            sessions,
            relay: ConnectionRelay::new(),
            workflow,
            gladia: Arc::new(GladiaClient::new(config.gladia.clone())?),
            heygen: Arc::new(HeyGenClient::new(config.heygen.clone())?),
            static_dir: config.server.static_dir.clone(),
        })
    }
}

/// Maximum request body size (1 MiB). Every route takes small JSON bodies.
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route(
            "/api/interview/start",
            post(api_interview::start_interview_handler),
        )
        .route(
            "/api/send-question",
            post(api_interview::send_question_handler),
        )
        .route(
            "/api/interview/end",
            post(api_interview::end_interview_handler),
        )
        .route("/api/gladia/init", post(api_gladia::gladia_init_handler))
        .route(
            "/api/heygen/create_token",
            post(api_heygen::create_token_handler),
        )
        .route(
            "/api/heygen/new_session",
            post(api_heygen::new_session_handler),
        )
        .route(
            "/api/heygen/start_session",
            post(api_heygen::start_session_handler),
        )
        .route(
            "/api/heygen/stop_session",
            post(api_heygen::stop_session_handler),
        )
        .route("/api/heygen/task", post(api_heygen::task_handler))
        .route(
            "/api/heygen/initiate_session",
            post(api_heygen::initiate_session_handler),
        )
        .route("/ws/interview/{session_id}", get(api_ws::ws_handler))
        .route("/ws/interview/{session_id}/", get(api_ws::ws_handler));

    // Serve browser assets if the directory exists.
    let static_dir = std::path::Path::new(&state.static_dir);
    let router = if static_dir.is_dir() {
        tracing::info!(path = %state.static_dir, "serving static files at /static");
        let router = router.nest_service("/static", ServeDir::new(static_dir));
        let index = static_dir.join("index.html");
        if index.exists() {
            router.route_service("/", ServeFile::new(index))
        } else {
            router
        }
    } else {
        tracing::info!(path = %state.static_dir, "static directory not found, skipping static file serving");
        router
    };

    router
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
