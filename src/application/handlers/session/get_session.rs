//! GetSessionInfoHandler - Query handler for session metadata.

use std::sync::Arc;

use serde::Serialize;

use super::SessionHandlerError;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::SessionStore;

/// Query for one session's metadata.
#[derive(Debug, Clone)]
pub struct GetSessionInfoQuery {
    pub session_id: SessionId,
}

/// Session metadata; the history itself is not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub session_id: SessionId,
    pub message_count: usize,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Handler for session metadata lookups.
pub struct GetSessionInfoHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionInfoHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetSessionInfoQuery) -> Result<SessionInfo, SessionHandlerError> {
        let session = self
            .store
            .get(&query.session_id)
            .await
            .ok_or(SessionHandlerError::NotFound(query.session_id))?;

        Ok(SessionInfo {
            session_id: session.id().clone(),
            message_count: session.message_count(),
            created_at: session.created_at(),
            updated_at: session.updated_at(),
        })
    }
}
