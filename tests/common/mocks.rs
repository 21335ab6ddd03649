//! Mock implementations for testing.
//!
//! Provides a mock LLM client that can be shared across test files
//! without making network calls.

use async_trait::async_trait;
use docchat::llm::LLMClient;
use docchat::types::{AppError, ChatMessage, Result};
use std::sync::{Arc, Mutex};

/// Mock LLM client with a fixed reply or a fixed failure.
///
/// Every conversation it receives is recorded so tests can inspect what
/// would have been sent.
#[derive(Clone)]
pub struct MockLLMClient {
    response: String,
    should_fail: bool,
    calls: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl MockLLMClient {
    /// Create a new mock client that returns the given response.
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            should_fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock client that always returns an error.
    pub fn failing() -> Self {
        Self {
            response: String::new(),
            should_fail: true,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Conversations received so far, oldest first
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate_with_history(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if self.should_fail {
            return Err(AppError::Request("Mock LLM failure".to_string()));
        }
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
