//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, errors)
//! - `session` - Chat session entity and bounded history
//! - `flow` - Static flow graphs and the traversal engine
//! - `intent` - Keyword classification and plate-number extraction

pub mod flow;
pub mod foundation;
pub mod intent;
pub mod session;
