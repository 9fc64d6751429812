//! Session store port.
//!
//! Defines the contract for the process-local store that owns every chat
//! session. Absence is never an error here: reads of unknown ids return
//! empty values and writes to unknown ids create the session.
//!
//! # Concurrency
//!
//! - Every mutation of one session is atomic with respect to every other
//!   operation on that session, including expiry
//! - Operations on different sessions never wait on each other beyond the
//!   duration of a map update
//! - [`SessionStore::lock_turn`] serializes multi-step read-modify-write
//!   sequences that span several store calls

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use crate::domain::foundation::SessionId;
use crate::domain::session::{ChatMessage, Role, Session};

/// Guard returned by [`SessionStore::lock_turn`]; dropping it releases the turn.
pub type TurnGuard = OwnedMutexGuard<()>;

/// Port for session state storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Allocates a fresh id and inserts an empty session under it.
    ///
    /// The returned id is visible to every caller as soon as this returns.
    async fn create(&self) -> SessionId;

    /// Returns a snapshot of the session, or `None` if it does not exist.
    async fn get(&self, id: &SessionId) -> Option<Session>;

    /// Appends a history entry, creating the session if needed.
    ///
    /// Enforces the configured history window by dropping the oldest entries.
    async fn add_message(&self, id: &SessionId, role: Role, content: String);

    /// Current history; empty for unknown sessions.
    async fn get_history(&self, id: &SessionId) -> Vec<ChatMessage>;

    /// Flow variable stored under `key`; empty string when absent.
    async fn get_flow_value(&self, id: &SessionId, key: &str) -> String;

    /// Stores a flow variable, creating the session if needed.
    async fn set_flow_value(&self, id: &SessionId, key: &str, value: String);

    /// Empties the history but keeps identity and flow state. No-op if absent.
    async fn clear(&self, id: &SessionId);

    /// Removes the session. No-op if absent.
    async fn delete(&self, id: &SessionId);

    /// Number of live sessions.
    async fn count(&self) -> usize;

    /// Acquires the per-session turn lock.
    ///
    /// Held across the read-advance-persist part of a chat turn so that two
    /// concurrent turns for the same session cannot both act on the same
    /// flow cursor. Turns for other sessions are unaffected. Must never be
    /// held across a network call.
    async fn lock_turn(&self, id: &SessionId) -> TurnGuard;
}
