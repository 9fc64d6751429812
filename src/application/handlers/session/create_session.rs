//! CreateSessionHandler - Command handler for creating new sessions.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::ports::SessionStore;

/// Command to create a new, empty session.
#[derive(Debug, Clone, Default)]
pub struct CreateSessionCommand;

/// Result of successful session creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSessionResult {
    pub session_id: SessionId,
}

/// Handler for creating sessions.
pub struct CreateSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl CreateSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, _cmd: CreateSessionCommand) -> CreateSessionResult {
        CreateSessionResult {
            session_id: self.store.create().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::session::{InMemorySessionStore, SessionStoreConfig};

    #[tokio::test]
    async fn creates_distinct_visible_sessions() {
        let store = Arc::new(InMemorySessionStore::new(SessionStoreConfig::default()));
        let handler = CreateSessionHandler::new(store.clone());

        let first = handler.handle(CreateSessionCommand).await;
        let second = handler.handle(CreateSessionCommand).await;

        assert_ne!(first.session_id, second.session_id);
        assert!(store.get(&first.session_id).await.is_some());
        assert_eq!(store.count().await, 2);
    }
}
