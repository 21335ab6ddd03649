//! Conversation transcript and request assembly.
//!
//! [`ChatManager`] keeps every message of the session for display, but only a
//! bounded tail of it is sent with each generation request: at most
//! `history_window` messages, further trimmed from the oldest end until the
//! estimated token count fits `history_token_budget`.

use tracing::{error, info};

use crate::llm::LLMClient;
use crate::types::{ChatMessage, Message, MessageRole};
use crate::utils::toml_config::ChatConfig;

/// Default number of recent messages to include in a request.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Default estimated-token budget for those messages.
pub const DEFAULT_HISTORY_TOKEN_BUDGET: usize = 2000;

/// Instructions sent as the first message of every request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant that answers questions based on the provided document context.
Your responses should be:
1. Accurate and based only on the provided context
2. Clear and well-structured
3. Natural and conversational
4. Complete - do not cut off mid-sentence
If you cannot find the answer in the context, say so honestly.";

/// Keeps only the most recent `window_size` messages.
pub fn truncate_history(history: &[Message], window_size: usize) -> &[Message] {
    &history[history.len().saturating_sub(window_size)..]
}

/// Estimates token count for a message (rough approximation).
///
/// Uses a simple heuristic of ~4 characters per token for English text.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Drops the oldest messages until the estimated total fits `token_budget`.
///
/// The kept messages are always a contiguous, most-recent tail.
pub fn truncate_history_to_tokens(history: &[Message], token_budget: usize) -> &[Message] {
    let mut total_tokens = 0;
    let mut start = history.len();

    for (i, msg) in history.iter().enumerate().rev() {
        let msg_tokens = estimate_tokens(&msg.content);
        if total_tokens + msg_tokens > token_budget {
            break;
        }
        total_tokens += msg_tokens;
        start = i;
    }

    &history[start..]
}

/// Owns the transcript of one chat session.
#[derive(Debug, Clone)]
pub struct ChatManager {
    history: Vec<Message>,
    system_prompt: String,
    history_window: usize,
    history_token_budget: usize,
}

impl Default for ChatManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatManager {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            history_window: DEFAULT_HISTORY_WINDOW,
            history_token_budget: DEFAULT_HISTORY_TOKEN_BUDGET,
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        let mut manager = Self::new()
            .with_history_window(config.history_window)
            .with_token_budget(config.history_token_budget);
        if let Some(prompt) = &config.system_prompt {
            manager = manager.with_system_prompt(prompt.clone());
        }
        manager
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_token_budget(mut self, budget: usize) -> Self {
        self.history_token_budget = budget;
        self
    }

    pub fn add_message(&mut self, role: MessageRole, content: impl Into<String>) {
        self.history.push(Message::new(role, content));
    }

    /// The full transcript, oldest first
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// The part of the transcript that accompanies the next request
    pub fn request_history(&self) -> &[Message] {
        let windowed = truncate_history(&self.history, self.history_window);
        truncate_history_to_tokens(windowed, self.history_token_budget)
    }

    /// System prompt, bounded transcript, then the question with its context.
    pub fn build_messages(&self, query: &str, chunks: &[String]) -> Vec<ChatMessage> {
        let prior = self.request_history();
        let mut messages = Vec::with_capacity(prior.len() + 2);

        messages.push(ChatMessage::system(self.system_prompt.as_str()));
        messages.extend(prior.iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(format!(
            "Context: {}\n\nQuestion: {}",
            chunks.join("\n"),
            query
        )));

        messages
    }

    /// Ask `client` about `query` with `chunks` as context.
    ///
    /// The question and the reply are both recorded. A generation failure
    /// does not fail the session: it is recorded and returned as an
    /// assistant message starting with `API Error:`.
    pub async fn get_response(
        &mut self,
        client: &dyn LLMClient,
        query: &str,
        chunks: &[String],
    ) -> String {
        let messages = self.build_messages(query, chunks);
        self.add_message(MessageRole::User, query);

        let reply = match client.generate_with_history(&messages).await {
            Ok(text) => {
                info!(
                    model = client.model_name(),
                    context_chunks = chunks.len(),
                    sent_messages = messages.len(),
                    "Received response"
                );
                text
            }
            Err(e) => {
                error!(error = %e, "Generation failed");
                format!("API Error: {}", e)
            }
        };

        self.add_message(MessageRole::Assistant, reply.as_str());
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedClient {
        reply: std::result::Result<String, String>,
        seen: Mutex<Vec<ChatMessage>>,
    }

    impl ScriptedClient {
        fn ok(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LLMClient for ScriptedClient {
        async fn generate_with_history(&self, messages: &[ChatMessage]) -> Result<String> {
            *self.seen.lock().unwrap() = messages.to_vec();
            self.reply.clone().map_err(AppError::Request)
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn message(content: &str) -> Message {
        Message::new(MessageRole::User, content)
    }

    #[test]
    fn test_truncate_history() {
        let history: Vec<Message> = (0..5).map(|i| message(&i.to_string())).collect();

        let kept = truncate_history(&history, 3);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[0].content, "2");

        assert_eq!(truncate_history(&history, 10).len(), 5);
        assert!(truncate_history(&history, 0).is_empty());
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_truncate_history_to_tokens_keeps_recent_tail() {
        let history = vec![
            message(&"a".repeat(40)), // 10 tokens
            message(&"b".repeat(40)),
            message(&"c".repeat(40)),
        ];

        let kept = truncate_history_to_tokens(&history, 25);
        assert_eq!(kept.len(), 2);
        assert!(kept[0].content.starts_with('b'));

        assert!(truncate_history_to_tokens(&history, 5).is_empty());
    }

    #[test]
    fn test_build_messages_layout() {
        let mut manager = ChatManager::new();
        manager.add_message(MessageRole::User, "Earlier question");
        manager.add_message(MessageRole::Assistant, "Earlier answer");

        let chunks = vec!["First chunk.".to_string(), "Second chunk.".to_string()];
        let messages = manager.build_messages("What now?", &chunks);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[0].content, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(messages[1], ChatMessage::user("Earlier question"));
        assert_eq!(messages[2], ChatMessage::assistant("Earlier answer"));
        assert_eq!(
            messages[3].content,
            "Context: First chunk.\nSecond chunk.\n\nQuestion: What now?"
        );
    }

    #[test]
    fn test_history_window_bounds_request_not_transcript() {
        let mut manager = ChatManager::new().with_history_window(2);
        for i in 0..6 {
            manager.add_message(MessageRole::User, format!("message {}", i));
        }

        let messages = manager.build_messages("q", &[]);
        // system + 2 prior + question
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].content, "message 4");
        assert_eq!(manager.history().len(), 6);
    }

    #[test]
    fn test_from_config() {
        let config = ChatConfig {
            history_window: 1,
            history_token_budget: 50,
            system_prompt: Some("Be brief.".to_string()),
        };
        let manager = ChatManager::from_config(&config);
        let messages = manager.build_messages("q", &[]);
        assert_eq!(messages[0].content, "Be brief.");
    }

    #[tokio::test]
    async fn test_get_response_records_exchange() {
        let client = ScriptedClient::ok("The dog ran.");
        let mut manager = ChatManager::new();

        let chunks = vec!["The dog ran.".to_string()];
        let reply = manager.get_response(&client, "What did the dog do?", &chunks).await;

        assert_eq!(reply, "The dog ran.");
        let history = manager.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, MessageRole::User);
        assert_eq!(history[0].content, "What did the dog do?");
        assert_eq!(history[1].role, MessageRole::Assistant);

        // The current question is sent once, inside the context message
        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
    }

    #[tokio::test]
    async fn test_get_response_turns_errors_into_messages() {
        let client = ScriptedClient::failing("401 Unauthorized");
        let mut manager = ChatManager::new();

        let reply = manager.get_response(&client, "Hello?", &[]).await;

        assert!(reply.starts_with("API Error:"));
        assert!(reply.contains("401 Unauthorized"));
        assert_eq!(manager.history().len(), 2);
        assert_eq!(manager.history()[1].content, reply);
    }

    #[test]
    fn test_clear() {
        let mut manager = ChatManager::new();
        manager.add_message(MessageRole::User, "hi");
        manager.clear();
        assert!(manager.history().is_empty());
    }
}
