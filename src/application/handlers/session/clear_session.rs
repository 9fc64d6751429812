//! ClearSessionHandler - empties a session's history.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

/// Command to clear a session's history. Flow state survives.
#[derive(Debug, Clone)]
pub struct ClearSessionCommand {
    pub session_id: SessionId,
}

pub struct ClearSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl ClearSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Unknown sessions are a no-op.
    pub async fn handle(&self, cmd: ClearSessionCommand) {
        self.store.clear(&cmd.session_id).await;
        tracing::info!(session_id = %cmd.session_id, "Session history cleared");
    }
}
