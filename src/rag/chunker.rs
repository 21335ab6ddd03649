//! Character chunking with overlap, built on `text-splitter`.
//!
//! Text is split along the coarsest semantic level that fits the chunk size
//! (line breaks, sentences, words, graphemes, characters) and neighbouring
//! sections are merged up to `chunk_size` characters. Each chunk after the
//! first starts with up to `chunk_overlap` characters taken from the end of
//! the previous one.
//!
//! Sizes are measured in characters, not bytes. Every chunk is a trimmed
//! substring of the input.

use serde::{Deserialize, Serialize};
use text_splitter::{ChunkConfig, TextSplitter};
use tracing::debug;

use crate::types::{AppError, Result};

/// Default maximum chunk length in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default number of characters shared by adjacent chunks.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Chunk size and overlap, as read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingOptions {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkingOptions {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Reject a zero chunk size or an overlap that would stall the window.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(AppError::Config(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Splits document text into overlapping chunks.
#[derive(Debug, Clone)]
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl TextChunker {
    /// Create a chunker.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::from_options(ChunkingOptions::new(chunk_size, chunk_overlap))
    }

    pub fn from_options(options: ChunkingOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            chunk_size: options.chunk_size,
            chunk_overlap: options.chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn options(&self) -> ChunkingOptions {
        ChunkingOptions::new(self.chunk_size, self.chunk_overlap)
    }

    /// Split `text` into ordered, non-empty chunks of at most `chunk_size`
    /// characters. Empty or whitespace-only input yields no chunks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the splitter rejects the size and
    /// overlap pair.
    pub fn chunk(&self, text: &str) -> Result<Vec<String>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let chunk_config = ChunkConfig::new(self.chunk_size)
            .with_overlap(self.chunk_overlap)
            .map_err(|e| AppError::Config(e.to_string()))?
            .with_trim(true);
        let splitter = TextSplitter::new(chunk_config);

        let chunks: Vec<String> = splitter
            .chunks(text)
            .filter(|chunk| !chunk.trim().is_empty())
            .map(str::to_string)
            .collect();

        debug!(
            chars = text.chars().count(),
            chunks = chunks.len(),
            chunk_size = self.chunk_size,
            chunk_overlap = self.chunk_overlap,
            "Chunked text"
        );

        Ok(chunks)
    }
}
