//! DeleteSessionHandler - removes a session entirely.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

#[derive(Debug, Clone)]
pub struct DeleteSessionCommand {
    pub session_id: SessionId,
}

pub struct DeleteSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl DeleteSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Unknown sessions are a no-op.
    pub async fn handle(&self, cmd: DeleteSessionCommand) {
        self.store.delete(&cmd.session_id).await;
        tracing::info!(session_id = %cmd.session_id, "Session deleted");
    }
}
