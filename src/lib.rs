//! # docchat - chat with a document
//!
//! Load one PDF, DOCX or text document and ask questions about it. The text is
//! split into overlapping chunks, the chunks are indexed with TF-IDF, and each
//! question is answered by a chat model from the chunks most similar to it.
//!
//! ## Overview
//!
//! docchat can be used in two ways:
//!
//! 1. **As a CLI** - Run the `docchat` binary
//! 2. **As a library** - Use the retrieval core on its own, or a whole
//!    [`ChatSession`] with your own [`LLMClient`]
//!
//! ### Retrieval Only
//!
//! ```
//! use docchat::rag::{ChunkingOptions, DocumentProcessor};
//!
//! let mut processor = DocumentProcessor::new(ChunkingOptions::default())?;
//! processor.process_document("Rust has no garbage collector. Memory is freed by ownership.")?;
//!
//! for chunk in processor.relevant_chunks("How is memory freed?", 3) {
//!     println!("{}", chunk);
//! }
//! # Ok::<(), docchat::AppError>(())
//! ```
//!
//! ### Full Session
//!
//! ```rust,ignore
//! use docchat::{create_client, ChatSession, DocChatConfig};
//!
//! let config = DocChatConfig::load_or_default(None)?;
//! let mut session = ChatSession::from_config(&config, create_client(&config)?)?;
//!
//! session.load_file("report.pdf")?;
//! println!("{}", session.ask("What are the key findings?").await);
//! ```
//!
//! ## Modules
//!
//! - [`rag`] - Chunking, TF-IDF indexing and retrieval
//! - [`extract`] - Text extraction from PDF, DOCX and plain text
//! - [`llm`] - Chat-completions client
//! - [`chat`] - Transcript and request assembly
//! - [`session`] - Per-user session tying the pieces together
//! - [`utils`] - Configuration and logging
//! - [`types`] - Common types and error handling

#![warn(rustdoc::missing_crate_level_docs)]

/// Transcript management and request assembly.
pub mod chat;
/// Command-line interface.
pub mod cli;
/// Document text extraction.
pub mod extract;
/// LLM client abstraction and HTTP implementation.
pub mod llm;
/// Retrieval pipeline: chunker, TF-IDF index, document processor.
pub mod rag;
/// Chat session state.
pub mod session;
/// Core types (messages, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use chat::ChatManager;
pub use extract::{extract_text, DocumentType};
pub use llm::{create_client, LLMClient, OpenRouterClient};
pub use rag::{ChunkingOptions, DocumentProcessor, TextChunker, TfidfIndex};
pub use session::ChatSession;
pub use types::{AppError, ChatMessage, Message, MessageRole, RankedChunk, Result};
pub use utils::toml_config::{ConfigError, DocChatConfig};
