//! One user's chat session: a document, a transcript and a model client.
//!
//! Nothing here is shared. Each session owns its own [`DocumentProcessor`]
//! and [`ChatManager`], so concurrent sessions never see each other's
//! document or history.

use std::path::Path;

use tracing::info;

use crate::chat::ChatManager;
use crate::llm::LLMClient;
use crate::rag::DocumentProcessor;
use crate::types::{Message, Result};
use crate::utils::toml_config::DocChatConfig;

pub struct ChatSession {
    processor: DocumentProcessor,
    chat: ChatManager,
    client: Box<dyn LLMClient>,
    top_k: usize,
}

impl ChatSession {
    pub fn new(
        processor: DocumentProcessor,
        chat: ChatManager,
        client: Box<dyn LLMClient>,
        top_k: usize,
    ) -> Self {
        Self {
            processor,
            chat,
            client,
            top_k,
        }
    }

    /// Build a session from configuration with the given client.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`](crate::AppError::Config) for invalid
    /// chunking options.
    pub fn from_config(config: &DocChatConfig, client: Box<dyn LLMClient>) -> Result<Self> {
        let options = config.rag.chunking_options();
        Ok(Self::new(
            DocumentProcessor::new(options)?,
            ChatManager::from_config(&config.chat),
            client,
            config.rag.top_k,
        ))
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Load a document file, replacing the current one. On failure the
    /// current document stays loaded.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        self.processor.process_file(path)?;
        Ok(self.processor.chunk_count())
    }

    /// Load raw text as the document.
    pub fn load_text(&mut self, text: &str) -> Result<usize> {
        self.processor.process_document(text)?;
        Ok(self.processor.chunk_count())
    }

    /// Retrieve context for `question` and ask the model.
    ///
    /// Always yields a reply; generation failures come back as
    /// `API Error: ...` text.
    pub async fn ask(&mut self, question: &str) -> String {
        let chunks = self.processor.relevant_chunks(question, self.top_k);
        info!(
            retrieved = chunks.len(),
            top_k = self.top_k,
            "Retrieved context"
        );
        self.chat
            .get_response(self.client.as_ref(), question, &chunks)
            .await
    }

    pub fn has_document(&self) -> bool {
        self.processor.has_document()
    }

    pub fn clear_document(&mut self) {
        self.processor.clear();
    }

    pub fn clear_history(&mut self) {
        self.chat.clear();
    }

    pub fn history(&self) -> &[Message] {
        self.chat.history()
    }

    pub fn processor(&self) -> &DocumentProcessor {
        &self.processor
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::ChunkingOptions;
    use crate::types::{AppError, ChatMessage};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Replies with the context message it was sent
    struct ContextEcho {
        seen: Arc<Mutex<Vec<ChatMessage>>>,
    }

    #[async_trait]
    impl LLMClient for ContextEcho {
        async fn generate_with_history(&self, messages: &[ChatMessage]) -> Result<String> {
            *self.seen.lock().unwrap() = messages.to_vec();
            messages
                .last()
                .map(|m| m.content.clone())
                .ok_or_else(|| AppError::Request("empty conversation".to_string()))
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn session() -> (ChatSession, Arc<Mutex<Vec<ChatMessage>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let client = ContextEcho { seen: seen.clone() };
        let session = ChatSession::new(
            DocumentProcessor::new(ChunkingOptions::new(15, 5)).unwrap(),
            ChatManager::new(),
            Box::new(client),
            1,
        );
        (session, seen)
    }

    #[tokio::test]
    async fn test_ask_sends_retrieved_context() {
        let (mut session, _) = session();
        let count = session
            .load_text("The cat sat. The dog ran. The bird flew.")
            .unwrap();
        assert!(count >= 3);

        let reply = session.ask("Where is the dog?").await;
        let context = reply
            .strip_prefix("Context: ")
            .and_then(|rest| rest.strip_suffix("\n\nQuestion: Where is the dog?"))
            .unwrap();
        assert!(context.contains("dog"), "{}", context);
        assert!(!context.contains("bird"));
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn test_ask_without_document_sends_empty_context() {
        let (mut session, _) = session();
        let reply = session.ask("Anything?").await;
        assert_eq!(reply, "Context: \n\nQuestion: Anything?");
    }

    #[tokio::test]
    async fn test_history_is_sent_on_follow_up() {
        let (mut session, seen) = session();
        session.load_text("The cat sat. The dog ran.").unwrap();

        session.ask("First?").await;
        session.ask("Second?").await;

        let sent = seen.lock().unwrap();
        // system, previous question, previous reply, new question
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[1].content, "First?");
    }

    #[test]
    fn test_clear_document_and_history() {
        let (mut session, _) = session();
        session.load_text("The cat sat.").unwrap();
        assert!(session.has_document());

        session.clear_document();
        assert!(!session.has_document());

        session.clear_history();
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_load_file_failure_keeps_document() {
        let (mut session, _) = session();
        session.load_text("The cat sat. The dog ran.").unwrap();

        let result = session.load_file("/nonexistent/missing.txt");
        assert!(matches!(result, Err(AppError::Io(_))));
        assert!(session.has_document());

        let result = session.load_file("notes.xlsx");
        assert!(matches!(result, Err(AppError::UnsupportedFormat(_))));
        assert!(session.has_document());
    }
}
