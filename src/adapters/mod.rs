//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `session` - In-memory session store with background expiry
//! - `flow` - Flow definition loading from JSON/YAML files
//! - `ai` - LLM providers and the prompt-assembling reply generator
//! - `catalog` - Service catalog and violation registry lookups
//! - `http` - axum REST surface

pub mod ai;
pub mod catalog;
pub mod flow;
pub mod http;
pub mod session;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider, PromptReplyGenerator, ReplySettings};
pub use catalog::{InMemoryViolationRegistry, JsonServiceCatalog};
pub use flow::FileFlowLoader;
pub use session::{InMemorySessionStore, SessionStoreConfig};
