//! Session entity.
//!
//! A session is one user's conversation: a bounded, chronological history
//! plus a free-form string map of flow variables (the active flow cursor
//! lives there). Sessions are owned exclusively by the session store; every
//! other component works on snapshots.

use std::collections::HashMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::message::{ChatMessage, Role};
use crate::domain::foundation::{SessionId, Timestamp};

/// Default number of history entries retained per session.
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Default inactivity period after which a session is evicted.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// A chat session.
///
/// # Invariants
///
/// - `id` never changes after construction
/// - `history.len()` never exceeds the limit passed to [`Session::append_message`];
///   the oldest entries are dropped first
/// - `updated_at` is refreshed by every mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    history: Vec<ChatMessage>,
    flow_state: HashMap<String, String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Creates an empty session.
    pub fn new(id: SessionId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            history: Vec::new(),
            flow_state: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a session from stored parts (no validation).
    pub fn reconstitute(
        id: SessionId,
        history: Vec<ChatMessage>,
        flow_state: HashMap<String, String>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            history,
            flow_state,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    pub fn flow_state(&self) -> &HashMap<String, String> {
        &self.flow_state
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns the flow variable stored under `key`, if any.
    pub fn flow_value(&self, key: &str) -> Option<&str> {
        self.flow_state.get(key).map(String::as_str)
    }

    /// Appends a history entry, keeping only the `limit` most recent ones.
    pub fn append_message(&mut self, role: Role, content: impl Into<String>, limit: usize) {
        self.history.push(ChatMessage::new(role, content));
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
        self.touch();
    }

    /// Stores a flow variable, replacing any previous value.
    pub fn set_flow_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.flow_state.insert(key.into(), value.into());
        self.touch();
    }

    /// Empties the history; identity and flow state are kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.touch();
    }

    /// True when the session has been idle for strictly longer than `ttl` at `now`.
    pub fn is_expired(&self, now: Timestamp, ttl: Duration) -> bool {
        now.duration_since(&self.updated_at) > ttl
    }

    fn touch(&mut self) {
        let now = Timestamp::now();
        // Never move backwards, even if the wall clock does.
        if now.is_after(&self.updated_at) {
            self.updated_at = now;
        }
    }
}
