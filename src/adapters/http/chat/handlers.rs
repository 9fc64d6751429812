//! HTTP handler for chat turns.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{ChatRequest, ChatResponse};
use crate::adapters::http::error::ErrorResponse;
use crate::application::handlers::chat::{ChatTurnError, ChatTurnHandler};
use crate::domain::foundation::ValidationError;

#[derive(Clone)]
pub struct ChatHandlers {
    turn_handler: Arc<ChatTurnHandler>,
}

impl ChatHandlers {
    pub fn new(turn_handler: Arc<ChatTurnHandler>) -> Self {
        Self { turn_handler }
    }
}

/// POST /api/v1/chat - Run one chat turn
pub async fn chat(
    State(handlers): State<ChatHandlers>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected chat request body");
            return ErrorResponse::bad_request("Invalid request body").with_status(StatusCode::BAD_REQUEST);
        }
    };

    match handlers.turn_handler.handle(req.into()).await {
        Ok(result) => (StatusCode::OK, Json(ChatResponse::from(result))).into_response(),
        Err(e) => handle_chat_error(e),
    }
}

fn handle_chat_error(error: ChatTurnError) -> Response {
    let status = match &error {
        ChatTurnError::Validation(_) => StatusCode::BAD_REQUEST,
        ChatTurnError::Reply(_) => StatusCode::BAD_GATEWAY,
    };
    let message = match &error {
        ChatTurnError::Validation(ValidationError::EmptyField { field }) if field == "message" => {
            "Message is required".to_string()
        }
        other => other.to_string(),
    };
    ErrorResponse::new(error.code(), message).with_status(status)
}
