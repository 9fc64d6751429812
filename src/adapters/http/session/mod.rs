//! HTTP adapter for session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{SessionCommandResponse, SessionInfoResponse};
pub use handlers::SessionHandlers;
pub use routes::session_routes;
