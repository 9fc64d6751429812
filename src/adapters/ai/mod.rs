//! AI Provider Adapters.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - OpenAI-compatible chat completions
//! - `MockAIProvider` - Configurable mock for testing
//! - `PromptReplyGenerator` - Builds the assistant prompt and calls a provider

mod mock_provider;
mod openai_provider;
mod prompt_reply_generator;

pub use mock_provider::{MockAIProvider, MockResponse, DEFAULT_MOCK_RESPONSE};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
pub use prompt_reply_generator::{format_rupiah, PromptReplyGenerator, ReplySettings};
