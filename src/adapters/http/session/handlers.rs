//! HTTP handlers for session endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{SessionCommandResponse, SessionInfoResponse};
use crate::adapters::http::error::ErrorResponse;
use crate::application::handlers::session::{
    ClearSessionCommand, ClearSessionHandler, CreateSessionCommand, CreateSessionHandler,
    DeleteSessionCommand, DeleteSessionHandler, GetSessionInfoHandler, GetSessionInfoQuery,
    SessionHandlerError,
};
use crate::domain::foundation::SessionId;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    create_handler: Arc<CreateSessionHandler>,
    get_handler: Arc<GetSessionInfoHandler>,
    clear_handler: Arc<ClearSessionHandler>,
    delete_handler: Arc<DeleteSessionHandler>,
}

impl SessionHandlers {
    pub fn new(
        create_handler: Arc<CreateSessionHandler>,
        get_handler: Arc<GetSessionInfoHandler>,
        clear_handler: Arc<ClearSessionHandler>,
        delete_handler: Arc<DeleteSessionHandler>,
    ) -> Self {
        Self {
            create_handler,
            get_handler,
            clear_handler,
            delete_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/session - Create a new session
pub async fn create_session(State(handlers): State<SessionHandlers>) -> Response {
    let result = handlers.create_handler.handle(CreateSessionCommand).await;
    let response = SessionCommandResponse::new(
        Some(result.session_id.to_string()),
        "Session created successfully",
    );
    (StatusCode::OK, Json(response)).into_response()
}

/// GET /api/v1/session/:id - Session metadata
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(GetSessionInfoQuery { session_id }).await {
        Ok(info) => (StatusCode::OK, Json(SessionInfoResponse::from(info))).into_response(),
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/v1/session/:id/clear - Clear history
pub async fn clear_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    handlers
        .clear_handler
        .handle(ClearSessionCommand {
            session_id: session_id.clone(),
        })
        .await;

    let response = SessionCommandResponse::new(Some(session_id.to_string()), "Session history cleared");
    (StatusCode::OK, Json(response)).into_response()
}

/// DELETE /api/v1/session/:id - Delete a session
pub async fn delete_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    handlers
        .delete_handler
        .handle(DeleteSessionCommand {
            session_id: session_id.clone(),
        })
        .await;

    let response = SessionCommandResponse::new(Some(session_id.to_string()), "Session deleted successfully");
    (StatusCode::OK, Json(response)).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>().map_err(|_| {
        ErrorResponse::bad_request("Session ID is required").with_status(StatusCode::BAD_REQUEST)
    })
}

fn handle_session_error(error: SessionHandlerError) -> Response {
    match error {
        SessionHandlerError::NotFound(_) => {
            ErrorResponse::not_found("Session not found").with_status(StatusCode::NOT_FOUND)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_not_found_maps_to_404() {
        let error = SessionHandlerError::NotFound(SessionId::generate());
        let response = handle_session_error(error);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn blank_session_id_is_rejected() {
        let response = parse_session_id("  ").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
