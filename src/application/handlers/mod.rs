//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod chat;
pub mod session;

pub use chat::{ChatTurnCommand, ChatTurnError, ChatTurnHandler, ChatTurnResult, FLOW_CURSOR_KEY};
pub use session::{
    ClearSessionCommand, ClearSessionHandler, CreateSessionCommand, CreateSessionHandler,
    CreateSessionResult, DeleteSessionCommand, DeleteSessionHandler, GetSessionInfoHandler,
    GetSessionInfoQuery, SessionHandlerError, SessionInfo,
};
