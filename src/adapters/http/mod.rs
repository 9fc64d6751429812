//! HTTP adapters - REST API implementations.
//!
//! Each endpoint group has its own module; [`app_router`] assembles them.

pub mod chat;
mod error;
mod router;
pub mod session;

pub use chat::{chat_routes, ChatHandlers, ChatRequest, ChatResponse};
pub use error::ErrorResponse;
pub use router::{app_router, AppState, HttpSettings, SERVICE_NAME};
pub use session::{session_routes, SessionCommandResponse, SessionHandlers, SessionInfoResponse};
