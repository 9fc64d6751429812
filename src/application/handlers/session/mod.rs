//! Session command and query handlers.
//!
//! Thin pass-throughs to the session store for the administrative surface.

mod clear_session;
mod create_session;
mod delete_session;
mod get_session;

use thiserror::Error;

use crate::domain::foundation::SessionId;

pub use clear_session::{ClearSessionCommand, ClearSessionHandler};
pub use create_session::{CreateSessionCommand, CreateSessionHandler, CreateSessionResult};
pub use delete_session::{DeleteSessionCommand, DeleteSessionHandler};
pub use get_session::{GetSessionInfoHandler, GetSessionInfoQuery, SessionInfo};

/// Errors from session handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionHandlerError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
}
