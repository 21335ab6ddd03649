//! CLI module for docchat
//!
//! Provides command-line interface parsing and handling for the `docchat` binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod commands;
pub mod interactive;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docchat - chat with a document
///
/// Loads one PDF, DOCX or text document, retrieves the passages most similar
/// to each question and asks a chat model to answer from them.
#[derive(Parser, Debug)]
#[command(
    name = "docchat",
    version,
    about = "Chat with a PDF, DOCX or text document",
    long_about = "Loads one document, splits it into overlapping chunks and indexes them with TF-IDF.\n\
                  Each question is answered by a chat model from the most similar chunks.",
    after_help = "EXAMPLES:\n    \
                  docchat chat report.pdf                    # Interactive chat about a document\n    \
                  docchat ask notes.md \"What is the deadline?\" # One question, one answer\n    \
                  docchat search notes.md deadline -k 5      # Show retrieved chunks, no API call\n    \
                  docchat chunks notes.md --chunk-size 300   # Inspect the chunking\n    \
                  docchat config                             # Print the effective configuration"
)]
pub struct Cli {
    /// Path to the configuration file (defaults to ./docchat.toml if present)
    #[arg(short, long, global = true, env = "DOCCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Override the chunk size in characters
    #[arg(long, global = true)]
    pub chunk_size: Option<usize>,

    /// Override the overlap between adjacent chunks in characters
    #[arg(long, global = true)]
    pub chunk_overlap: Option<usize>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session
    ///
    /// Type a question to ask about the loaded document. Use `/load <path>`
    /// to switch documents, `clear` to reset the conversation and `quit` to
    /// leave.
    Chat {
        /// Document to load before the first question
        file: Option<PathBuf>,

        /// Chunks retrieved per question
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Ask a single question about a document
    Ask {
        /// Document to load
        file: PathBuf,

        /// The question
        question: String,

        /// Chunks retrieved for the question
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Show the chunks retrieved for a query, with similarity scores
    Search {
        /// Document to load
        file: PathBuf,

        /// The query
        query: String,

        /// Number of chunks to show
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Print the chunk sequence of a document
    Chunks {
        /// Document to load
        file: PathBuf,
    },

    /// Show configuration information
    Config {
        /// Only validate, print nothing on success
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
