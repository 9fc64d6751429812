//! Top-level router: banner, health, API routes and cross-cutting layers.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::chat::{chat_routes, ChatHandlers};
use super::error::ErrorResponse;
use super::session::{session_routes, SessionHandlers};
use crate::application::handlers::chat::ChatTurnHandler;
use crate::application::handlers::session::{
    ClearSessionHandler, CreateSessionHandler, DeleteSessionHandler, GetSessionInfoHandler,
};
use crate::domain::foundation::ErrorCode;
use crate::ports::SessionStore;

/// Service name reported by `/` and `/health`.
pub const SERVICE_NAME: &str = "police-assistant";

/// Everything the router needs to serve requests.
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatHandlers,
    pub sessions: SessionHandlers,
    pub store: Arc<dyn SessionStore>,
}

impl AppState {
    /// Wires the session handlers over `store` next to the chat handler.
    pub fn new(store: Arc<dyn SessionStore>, chat: Arc<ChatTurnHandler>) -> Self {
        let sessions = SessionHandlers::new(
            Arc::new(CreateSessionHandler::new(store.clone())),
            Arc::new(GetSessionInfoHandler::new(store.clone())),
            Arc::new(ClearSessionHandler::new(store.clone())),
            Arc::new(DeleteSessionHandler::new(store.clone())),
        );
        Self {
            chat: ChatHandlers::new(chat),
            sessions,
            store,
        }
    }
}

/// Transport settings applied as layers.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    /// Allowed origins; empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

/// Builds the application router.
pub fn app_router(state: AppState, settings: &HttpSettings) -> Router {
    let root = Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .with_state(state.store.clone());

    root.nest("/api/v1/chat", chat_routes(state.chat))
        .nest("/api/v1/session", session_routes(state.sessions))
        .fallback(not_found)
        .layer(cors_layer(&settings.cors_origins))
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(parsed)
    }
}

/// GET / - Service banner
async fn banner() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "AI Police Assistant API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "chat": "/api/v1/chat",
            "session": "/api/v1/session",
        },
    }))
}

/// GET /health - Liveness plus active session count
async fn health(State(store): State<Arc<dyn SessionStore>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "active_sessions": store.count().await,
    }))
}

async fn not_found() -> Response {
    let body = ErrorResponse::new(ErrorCode::RouteNotFound, "The requested endpoint does not exist");
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}
