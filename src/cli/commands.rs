//! Subcommand handlers.

use std::path::Path;

use tracing::debug;

use crate::cli::interactive::run_chat;
use crate::cli::output::Output;
use crate::cli::{Cli, Commands};
use crate::llm::create_client;
use crate::rag::DocumentProcessor;
use crate::session::ChatSession;
use crate::types::Result;
use crate::utils::toml_config::{ConfigError, DocChatConfig};

/// Effective configuration: file or defaults, env overrides, then flags.
pub fn resolve_config(cli: &Cli) -> Result<DocChatConfig> {
    let mut config = DocChatConfig::load_or_default(cli.config.as_deref())?;

    if let Some(size) = cli.chunk_size {
        config.rag.chunk_size = size;
    }
    if let Some(overlap) = cli.chunk_overlap {
        config.rag.chunk_overlap = overlap;
    }
    if cli.chunk_size.is_some() || cli.chunk_overlap.is_some() {
        config.validate()?;
    }

    Ok(config)
}

/// Execute the parsed command against a resolved configuration.
pub async fn execute(cli: Cli, config: DocChatConfig) -> Result<()> {
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Commands::Chunks { file } => show_chunks(&config, &file, &output),
        Commands::Search {
            file,
            query,
            top_k,
        } => search(&config, &file, &query, top_k, &output),
        Commands::Ask {
            file,
            question,
            top_k,
        } => ask(&config, &file, &question, top_k, &output).await,
        Commands::Chat { file, top_k } => chat(&config, file.as_deref(), top_k, &output).await,
        Commands::Config { validate } => show_config(&config, validate, &output),
    }
}

fn load_processor(config: &DocChatConfig, file: &Path) -> Result<DocumentProcessor> {
    let mut processor = DocumentProcessor::new(config.rag.chunking_options())?;
    processor.process_file(file)?;
    Ok(processor)
}

fn show_chunks(config: &DocChatConfig, file: &Path, output: &Output) -> Result<()> {
    let processor = load_processor(config, file)?;

    output.header(&file.display().to_string());
    output.kv("chunks", &processor.chunk_count().to_string());
    output.kv("vocabulary", &processor.vocabulary_size().to_string());
    output.kv("chunk size", &config.rag.chunk_size.to_string());
    output.kv("chunk overlap", &config.rag.chunk_overlap.to_string());

    for (position, chunk) in processor.chunks().iter().enumerate() {
        output.chunk(position, chunk);
    }
    Ok(())
}

fn search(
    config: &DocChatConfig,
    file: &Path,
    query: &str,
    top_k: Option<usize>,
    output: &Output,
) -> Result<()> {
    let processor = load_processor(config, file)?;
    let k = top_k.unwrap_or(config.rag.top_k);
    let ranked = processor.ranked_chunks(query, k)?;

    if ranked.is_empty() {
        output.warning("No chunks to rank; the document contains no text.");
        return Ok(());
    }

    for (rank, chunk) in ranked.iter().enumerate() {
        output.ranked_chunk(rank + 1, chunk);
    }
    Ok(())
}

async fn ask(
    config: &DocChatConfig,
    file: &Path,
    question: &str,
    top_k: Option<usize>,
    output: &Output,
) -> Result<()> {
    let mut session = new_session(config, top_k)?;
    if session.load_file(file)? == 0 {
        output.warning(&format!("{} contains no text", file.display()));
    }

    let reply = session.ask(question).await;
    println!("{}", reply);
    Ok(())
}

async fn chat(
    config: &DocChatConfig,
    file: Option<&Path>,
    top_k: Option<usize>,
    output: &Output,
) -> Result<()> {
    let mut session = new_session(config, top_k)?;

    output.banner();
    output.kv("model", session.model_name());
    if let Some(file) = file {
        match session.load_file(file) {
            Ok(chunks) => {
                output.success(&format!("Loaded {} ({} chunks)", file.display(), chunks))
            }
            Err(e) => output.error(&format!("Error processing document: {}", e)),
        }
    }

    let stdin = std::io::stdin();
    run_chat(&mut session, stdin.lock(), output).await
}

fn new_session(config: &DocChatConfig, top_k: Option<usize>) -> Result<ChatSession> {
    let client = create_client(config)?;
    let session = ChatSession::from_config(config, client)?;
    debug!(model = session.model_name(), "Created chat session");

    Ok(match top_k {
        Some(k) => session.with_top_k(k),
        None => session,
    })
}

fn show_config(config: &DocChatConfig, validate: bool, output: &Output) -> Result<()> {
    config.validate()?;
    if validate {
        output.success("Configuration is valid");
        return Ok(());
    }

    print!("{}", config.to_toml()?);
    match config.api_key() {
        Ok(_) => output.success(&format!("{} is set", config.llm.api_key_env)),
        Err(ConfigError::MissingEnvVar(name)) => {
            output.warning(&format!("{} is not set; chat and ask will fail", name))
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
