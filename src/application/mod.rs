//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Write paths (chat turns, session commands) and read paths (session info)
//! live in separate handlers.

pub mod handlers;

pub use handlers::{
    // Chat
    ChatTurnCommand, ChatTurnError, ChatTurnHandler, ChatTurnResult, FLOW_CURSOR_KEY,
    // Session handlers
    ClearSessionCommand, ClearSessionHandler, CreateSessionCommand, CreateSessionHandler,
    CreateSessionResult, DeleteSessionCommand, DeleteSessionHandler, GetSessionInfoHandler,
    GetSessionInfoQuery, SessionHandlerError, SessionInfo,
};
