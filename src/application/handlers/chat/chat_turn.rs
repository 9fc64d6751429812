//! ChatTurnHandler - orchestrates one chat turn.
//!
//! Per turn:
//!
//! 1. resolve the session id, creating a session when none is supplied
//! 2. classify the message; every matched branch runs
//! 3. under the session's turn lock, read the flow cursor, advance it and
//!    persist the result, then snapshot the history
//! 4. release the lock and ask the reply generator for the answer
//! 5. append the user message and the reply to the history
//!
//! When no choice matches, the cursor stays where it is and the current
//! node is surfaced again so the user is re-prompted with the same step.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::flow::FlowEngine;
use crate::domain::foundation::{ErrorCode, NodeId, SessionId, ValidationError};
use crate::domain::intent::{extract_plate_number, IntentClassifier};
use crate::domain::session::{ChatMessage, Role};
use crate::ports::{
    AIError, ActiveFlow, ReplyGenerator, ServiceCatalog, ServiceInfo, SessionStore, TurnContext,
    UploadedDocument, ViolationInfo, ViolationLookup,
};

/// Flow-state key holding the license wizard cursor.
pub const FLOW_CURSOR_KEY: &str = "sim_flow_current_node";

/// Command carrying one inbound chat message.
#[derive(Debug, Clone, Default)]
pub struct ChatTurnCommand {
    /// Existing session id; `None` or empty starts a new session.
    pub session_id: Option<String>,
    pub message: String,
    /// History supplied by older clients; used only when the session has none.
    pub history: Vec<ChatMessage>,
    pub documents: Vec<UploadedDocument>,
}

impl ChatTurnCommand {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.history = history;
        self
    }

    pub fn with_documents(mut self, documents: Vec<UploadedDocument>) -> Self {
        self.documents = documents;
        self
    }
}

/// Outcome of a successful turn.
#[derive(Debug, Clone)]
pub struct ChatTurnResult {
    pub session_id: SessionId,
    pub response: String,
    pub active_flow: Option<ActiveFlow>,
    pub service_info: Option<ServiceInfo>,
    pub violation_info: Option<ViolationInfo>,
}

/// Errors that abort a chat turn.
#[derive(Debug, Clone, Error)]
pub enum ChatTurnError {
    #[error("Invalid chat turn: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to get AI response: {0}")]
    Reply(#[from] AIError),
}

impl ChatTurnError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ChatTurnError::Validation(err) => err.into(),
            ChatTurnError::Reply(AIError::RateLimited { .. }) => ErrorCode::RateLimited,
            ChatTurnError::Reply(AIError::Timeout { .. }) => ErrorCode::Timeout,
            ChatTurnError::Reply(_) => ErrorCode::AIProviderError,
        }
    }
}

/// Handler for chat turns.
pub struct ChatTurnHandler {
    store: Arc<dyn SessionStore>,
    engine: FlowEngine,
    classifier: IntentClassifier,
    catalog: Arc<dyn ServiceCatalog>,
    violations: Arc<dyn ViolationLookup>,
    replies: Arc<dyn ReplyGenerator>,
}

impl ChatTurnHandler {
    pub fn new(
        store: Arc<dyn SessionStore>,
        engine: FlowEngine,
        catalog: Arc<dyn ServiceCatalog>,
        violations: Arc<dyn ViolationLookup>,
        replies: Arc<dyn ReplyGenerator>,
    ) -> Self {
        Self {
            store,
            engine,
            classifier: IntentClassifier::default(),
            catalog,
            violations,
            replies,
        }
    }

    /// Replaces the default keyword vocabularies.
    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub async fn handle(&self, cmd: ChatTurnCommand) -> Result<ChatTurnResult, ChatTurnError> {
        if cmd.message.trim().is_empty() {
            return Err(ValidationError::empty_field("message").into());
        }

        let session_id = self.resolve_session(cmd.session_id.as_deref()).await?;
        let message = cmd.message.as_str();
        let intents = self.classifier.classify(message);

        tracing::debug!(
            session_id = %session_id,
            service = intents.service_request,
            flow = intents.flow_trigger,
            violation = intents.violation_check,
            documents = cmd.documents.len(),
            "Chat turn classified"
        );

        let mut context = TurnContext::new(session_id.clone());
        context.documents = cmd.documents;

        if intents.service_request {
            let info = self.catalog.search(message).await;
            if info.found {
                context.service_info = Some(info);
            }
        }

        if intents.violation_check {
            if let Some(plate) = extract_plate_number(message) {
                let info = self.violations.check(&plate).await;
                tracing::info!(
                    session_id = %session_id,
                    plate = %plate,
                    has_violation = info.has_violation,
                    total_fine = info.total_fine,
                    "Violation record attached"
                );
                context.violation_info = Some(info);
            }
        }

        {
            let _turn = self.store.lock_turn(&session_id).await;
            if intents.flow_trigger {
                context.active_flow = self.step_flow(&session_id, message).await;
            }
            context.history = self.store.get_history(&session_id).await;
        }

        if context.history.is_empty() && !cmd.history.is_empty() {
            tracing::debug!(
                session_id = %session_id,
                messages = cmd.history.len(),
                "Using caller-supplied history"
            );
            context.history = cmd.history;
        }

        let response = self.replies.generate(&context, message).await.map_err(|err| {
            tracing::warn!(session_id = %session_id, error = %err, "Reply generation failed");
            ChatTurnError::from(err)
        })?;

        self.store
            .add_message(&session_id, Role::User, message.to_string())
            .await;
        self.store
            .add_message(&session_id, Role::Assistant, response.clone())
            .await;

        tracing::info!(session_id = %session_id, "Chat turn completed");

        Ok(ChatTurnResult {
            session_id,
            response,
            active_flow: context.active_flow,
            service_info: context.service_info,
            violation_info: context.violation_info,
        })
    }

    async fn resolve_session(&self, raw: Option<&str>) -> Result<SessionId, ValidationError> {
        match raw.filter(|id| !id.is_empty()) {
            Some(id) => SessionId::new(id),
            None => {
                let id = self.store.create().await;
                tracing::debug!(session_id = %id, "No session id supplied, started a new session");
                Ok(id)
            }
        }
    }

    /// Reads, advances and persists the flow cursor. Caller holds the turn lock.
    async fn step_flow(&self, session_id: &SessionId, message: &str) -> Option<ActiveFlow> {
        let stored = self.store.get_flow_value(session_id, FLOW_CURSOR_KEY).await;
        let entry = self.engine.entry_node_id().clone();

        let current = if stored.is_empty() {
            self.store
                .set_flow_value(session_id, FLOW_CURSOR_KEY, entry.to_string())
                .await;
            tracing::info!(session_id = %session_id, node_id = %entry, "Flow started");
            entry
        } else if self.engine.get_node(&stored).is_none() {
            tracing::warn!(
                session_id = %session_id,
                node_id = %stored,
                "Flow cursor points at an unknown node, restarting from entry"
            );
            self.store
                .set_flow_value(session_id, FLOW_CURSOR_KEY, entry.to_string())
                .await;
            entry
        } else {
            NodeId::from(stored)
        };

        match self.engine.advance(current.as_str(), message) {
            Some(step) => {
                self.store
                    .set_flow_value(session_id, FLOW_CURSOR_KEY, step.node_id.to_string())
                    .await;
                tracing::info!(
                    session_id = %session_id,
                    from = %current,
                    node_id = %step.node_id,
                    node_type = %step.node.node_type,
                    "Flow cursor moved"
                );
                Some(ActiveFlow::from_node(step.node))
            }
            None => {
                tracing::debug!(session_id = %session_id, node_id = %current, "No transition matched, staying on node");
                self.engine.get_node(current.as_str()).map(ActiveFlow::from_node)
            }
        }
    }
}
