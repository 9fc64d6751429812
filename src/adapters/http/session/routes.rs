//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{clear_session, create_session, delete_session, get_session, SessionHandlers};

/// Creates the session router with all endpoints.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session).delete(delete_session))
        .route("/:id/clear", post(clear_session))
        .with_state(handlers)
}
