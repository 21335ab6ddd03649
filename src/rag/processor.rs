//! Document state for one chat session.
//!
//! A [`DocumentProcessor`] holds the chunk sequence and TF-IDF index of at
//! most one document. Processing a new document replaces both together;
//! [`DocumentProcessor::clear`] discards both together.

use std::path::Path;

use tracing::{debug, error, info};

use crate::extract::{extract_text, DocumentType};
use crate::rag::chunker::{ChunkingOptions, TextChunker};
use crate::rag::tfidf::TfidfIndex;
use crate::types::{AppError, RankedChunk, Result};

/// Default number of chunks handed to the generation step.
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct DocumentProcessor {
    chunker: TextChunker,
    chunks: Vec<String>,
    index: Option<TfidfIndex>,
}

impl DocumentProcessor {
    /// Create an empty processor.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] for a zero chunk size or an overlap that
    /// is not smaller than the chunk size.
    pub fn new(options: ChunkingOptions) -> Result<Self> {
        Ok(Self {
            chunker: TextChunker::from_options(options)?,
            chunks: Vec::new(),
            index: None,
        })
    }

    pub fn options(&self) -> ChunkingOptions {
        self.chunker.options()
    }

    /// Chunk `raw_text` and rebuild the index, replacing any previous document.
    pub fn process_document(&mut self, raw_text: &str) -> Result<()> {
        let chunker = self.chunker.clone();
        self.replace_document(raw_text, &chunker)
    }

    /// Like [`process_document`](Self::process_document) with one-off
    /// chunking options. Invalid options leave the current document intact.
    pub fn process_document_with(
        &mut self,
        raw_text: &str,
        options: ChunkingOptions,
    ) -> Result<()> {
        let chunker = TextChunker::from_options(options)?;
        self.replace_document(raw_text, &chunker)
    }

    /// Read, extract and process a file. The document type comes from the
    /// file extension. Any failure leaves the current document intact.
    pub fn process_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let document_type = DocumentType::from_path(path)?;
        let bytes = std::fs::read(path)?;
        let text = extract_text(&bytes, document_type)?;

        info!(
            path = %path.display(),
            document_type = %document_type,
            chars = text.chars().count(),
            "Extracted document text"
        );

        self.process_document(&text)
    }

    /// Nothing is replaced unless chunking succeeds.
    fn replace_document(&mut self, raw_text: &str, chunker: &TextChunker) -> Result<()> {
        let chunks = chunker.chunk(raw_text)?;
        let index = TfidfIndex::fit(&chunks);

        info!(
            chunks = chunks.len(),
            vocabulary = index.as_ref().map_or(0, TfidfIndex::vocabulary_size),
            "Processed document"
        );

        self.chunks = chunks;
        self.index = index;
        Ok(())
    }

    /// The `k` chunks most similar to `query`, most relevant first.
    ///
    /// Never fails: with no document, or if ranking fails internally, the
    /// result is empty.
    pub fn relevant_chunks(&self, query: &str, k: usize) -> Vec<String> {
        match self.ranked_chunks(query, k) {
            Ok(ranked) => ranked.into_iter().map(|chunk| chunk.text).collect(),
            Err(e) => {
                error!(error = %e, "Error getting relevant chunks");
                Vec::new()
            }
        }
    }

    /// Scored variant of [`relevant_chunks`](Self::relevant_chunks).
    pub fn ranked_chunks(&self, query: &str, k: usize) -> Result<Vec<RankedChunk>> {
        let Some(index) = self.index.as_ref() else {
            return Ok(Vec::new());
        };

        if index.len() != self.chunks.len() {
            return Err(AppError::Retrieval(format!(
                "Index has {} rows for {} chunks",
                index.len(),
                self.chunks.len()
            )));
        }

        let ranked = index
            .rank(query, k)?
            .into_iter()
            .map(|(position, score)| {
                self.chunks
                    .get(position)
                    .map(|text| RankedChunk {
                        position,
                        score,
                        text: text.clone(),
                    })
                    .ok_or_else(|| {
                        AppError::Retrieval(format!("Chunk {} out of range", position))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(query, k, returned = ranked.len(), "Ranked chunks");
        Ok(ranked)
    }

    /// True once a document with at least one chunk has been processed.
    pub fn has_document(&self) -> bool {
        self.index.is_some() && !self.chunks.is_empty()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
        self.index = None;
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.index.as_ref().map_or(0, TfidfIndex::vocabulary_size)
    }
}
