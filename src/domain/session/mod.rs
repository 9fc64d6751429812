//! Session domain module.
//!
//! Chat sessions hold a bounded conversation history and a string-keyed map
//! of flow variables. Flow variables are deliberately untyped so new flows
//! can add keys without a schema change.

mod aggregate;
mod message;

pub use aggregate::{Session, DEFAULT_HISTORY_LIMIT, DEFAULT_SESSION_TTL_HOURS};
pub use message::{ChatMessage, Role};
