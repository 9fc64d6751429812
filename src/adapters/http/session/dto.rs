//! HTTP DTOs for session endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::session::SessionInfo;

/// Response for session command operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCommandResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub message: String,
}

impl SessionCommandResponse {
    pub fn new(session_id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            session_id,
            message: message.into(),
        }
    }
}

/// Session metadata for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfoResponse {
    pub success: bool,
    pub session_id: String,
    pub message_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SessionInfo> for SessionInfoResponse {
    fn from(info: SessionInfo) -> Self {
        Self {
            success: true,
            session_id: info.session_id.to_string(),
            message_count: info.message_count,
            created_at: info.created_at.as_datetime().to_rfc3339(),
            updated_at: info.updated_at.as_datetime().to_rfc3339(),
        }
    }
}
