//! Retrieval pipeline for a single document.
//!
//! # Module Structure
//!
//! - [`rag::chunker`](crate::rag::chunker) - Character chunking with overlap on `text-splitter`
//! - [`rag::tfidf`](crate::rag::tfidf) - TF-IDF index and cosine-similarity ranking
//! - [`rag::processor`](crate::rag::processor) - Owns the chunks and index of the current document
//!
//! # Pipeline
//!
//! 1. **Chunking** - Document text is split into overlapping chunks
//! 2. **Indexing** - A TF-IDF vocabulary is fitted over the chunks
//! 3. **Retrieval** - A query is encoded in that vocabulary and the top-k
//!    chunks by cosine similarity are returned
//! 4. **Generation** - The chunks become the context of a chat request
//!
//! # Example
//!
//! ```
//! use docchat::rag::{ChunkingOptions, DocumentProcessor};
//!
//! let mut processor = DocumentProcessor::new(ChunkingOptions::new(15, 5))?;
//! processor.process_document("The cat sat. The dog ran. The bird flew.")?;
//!
//! let chunks = processor.relevant_chunks("dog", 1);
//! assert_eq!(chunks.len(), 1);
//! assert!(chunks[0].contains("dog"));
//! # Ok::<(), docchat::AppError>(())
//! ```

pub mod chunker;
pub mod processor;
pub mod tfidf;

pub use chunker::{ChunkingOptions, TextChunker, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
pub use processor::{DocumentProcessor, DEFAULT_TOP_K};
pub use tfidf::{SparseVector, TfidfIndex};
