//! `tr-completion` — completion-service client for ThreadRelay.
//!
//! Provides the [`CompletionProvider`] trait that abstracts over the LLM
//! completion service, and an OpenAI-compatible REST implementation
//! ([`OpenAiCompatClient`]) that works with OpenAI, Azure-less gateways,
//! Ollama, vLLM, and anything else speaking the chat completions contract.

pub mod openai;
pub mod traits;

pub use openai::OpenAiCompatClient;
pub use traits::{CompletionProvider, CompletionRequest};
