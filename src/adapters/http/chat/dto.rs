//! HTTP DTOs for the chat endpoint.

use serde::{Deserialize, Serialize};

use crate::application::handlers::chat::{ChatTurnCommand, ChatTurnResult};
use crate::domain::session::ChatMessage;
use crate::ports::{ActiveFlow, ServiceInfo, UploadedDocument, ViolationInfo};

/// Request body of `POST /api/v1/chat`.
///
/// Unknown fields (such as the legacy `context` object) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default)]
    pub documents: Vec<UploadedDocument>,
}

impl From<ChatRequest> for ChatTurnCommand {
    fn from(req: ChatRequest) -> Self {
        Self {
            session_id: req.session_id,
            message: req.message,
            history: req.history,
            documents: req.documents,
        }
    }
}

/// Response body of a successful chat turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sim_flow_info: Option<ActiveFlow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pelayanan_info: Option<ServiceInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_tilang_info: Option<ViolationInfo>,
}

impl From<ChatTurnResult> for ChatResponse {
    fn from(result: ChatTurnResult) -> Self {
        Self {
            success: true,
            response: result.response,
            session_id: result.session_id.to_string(),
            sim_flow_info: result.active_flow,
            pelayanan_info: result.service_info,
            e_tilang_info: result.violation_info,
        }
    }
}
