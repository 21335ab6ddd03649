//! Response generation
//!
//! The rest of the crate talks to a model only through the [`LLMClient`]
//! trait. [`OpenRouterClient`] is the one network implementation: it speaks
//! the OpenAI-compatible chat-completions protocol, so any compatible
//! endpoint works by changing `llm.api_base`.

/// Core LLM client trait and client construction.
pub mod client;
/// OpenAI-compatible chat-completions client.
pub mod openrouter;

pub use client::{create_client, LLMClient};
pub use openrouter::OpenRouterClient;
