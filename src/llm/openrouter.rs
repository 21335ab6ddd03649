use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::llm::client::LLMClient;
use crate::types::{AppError, ChatMessage, Result};
use crate::utils::toml_config::LlmConfig;

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// Defaults target OpenRouter; the `HTTP-Referer` and `X-Title` headers are
/// how OpenRouter attributes traffic to an application.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http_client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        let defaults = LlmConfig::default();
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model,
            temperature: defaults.temperature,
            max_tokens: defaults.max_tokens,
            referer: defaults.referer,
            title: defaults.title,
        }
    }

    /// Build a client from the `[llm]` section.
    pub fn from_config(config: &LlmConfig, api_key: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            referer: config.referer.clone(),
            title: config.title.clone(),
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn request_body(&self, messages: &[ChatMessage]) -> Value {
        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "stream": false,
        })
    }

    fn parse_response(body: &Value) -> Result<String> {
        if let Some(message) = body.pointer("/error/message").and_then(Value::as_str) {
            return Err(AppError::Request(format!("API returned an error: {}", message)));
        }

        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AppError::Request("Response has no message content".to_string()))
    }
}

#[async_trait]
impl LLMClient for OpenRouterClient {
    async fn generate_with_history(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = self.completions_url();
        debug!(model = %self.model, messages = messages.len(), "Sending chat completion");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&self.request_body(messages))
            .send()
            .await
            .map_err(|e| AppError::Request(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Request(format!(
                "Chat completion failed ({}): {}",
                status, text
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Request(format!("Failed to parse response: {}", e)))?;

        Self::parse_response(&body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
