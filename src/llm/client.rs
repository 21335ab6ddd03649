use crate::llm::openrouter::OpenRouterClient;
use crate::types::{AppError, ChatMessage, Result};
use crate::utils::toml_config::DocChatConfig;
use async_trait::async_trait;

/// Generic LLM client trait
///
/// Implementations must be shareable across tasks; the chat loop holds one
/// boxed client for the whole session.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a reply to a full role-tagged conversation
    async fn generate_with_history(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Create the configured client.
///
/// # Errors
///
/// Returns [`AppError::Config`] if the API key variable named by
/// `llm.api_key_env` is unset, or [`AppError::Request`] if the HTTP client
/// cannot be built.
pub fn create_client(config: &DocChatConfig) -> Result<Box<dyn LLMClient>> {
    let api_key = config.api_key().map_err(|e| {
        AppError::Config(format!(
            "{}. Set it in your environment or a .env file",
            e
        ))
    })?;

    Ok(Box::new(OpenRouterClient::from_config(&config.llm, api_key)?))
}
