//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionStore` - Process-local session state with expiry
//! - `AIProvider` - LLM chat completions
//! - `ReplyGenerator` - Turns a context bundle into the assistant reply
//! - `ServiceCatalog` - Service requirement lookups
//! - `ViolationLookup` - Traffic-violation records by plate number

mod ai_provider;
mod reply_generator;
mod service_catalog;
mod session_store;
mod violation_lookup;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use reply_generator::{
    ActiveFlow, ActiveFlowChoice, ReplyGenerator, TurnContext, UploadedDocument,
};
pub use service_catalog::{ServiceCatalog, ServiceInfo, ServiceRecord};
pub use session_store::{SessionStore, TurnGuard};
pub use violation_lookup::{Violation, ViolationInfo, ViolationLookup, ViolationStatus};
