//! Chat turn handling.

mod chat_turn;

pub use chat_turn::{
    ChatTurnCommand, ChatTurnError, ChatTurnHandler, ChatTurnResult, FLOW_CURSOR_KEY,
};
