//! Line-oriented chat loop.

use std::io::BufRead;

use crate::cli::output::Output;
use crate::session::ChatSession;
use crate::types::{MessageRole, Result};

const HELP: &str = "Commands: /load <path>, /reset, /history, clear, quit";

/// What the loop should do with one line of input
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Quit,
    ClearHistory,
    Reset,
    History,
    Help,
    Load(&'a str),
    Question(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    match line {
        "" => Input::Empty,
        "quit" | "exit" | "/quit" => Input::Quit,
        "clear" | "/clear" => Input::ClearHistory,
        "/reset" => Input::Reset,
        "/history" => Input::History,
        "/help" | "help" => Input::Help,
        _ => match line.strip_prefix("/load") {
            Some(path) if path.is_empty() || path.starts_with(char::is_whitespace) => {
                Input::Load(path.trim())
            }
            _ => Input::Question(line),
        },
    }
}

/// Run the chat loop until `quit` or end of input.
pub async fn run_chat<R: BufRead>(
    session: &mut ChatSession,
    mut input: R,
    output: &Output,
) -> Result<()> {
    output.hint(HELP);
    if !session.has_document() {
        output.warning("No document loaded. Use /load <path> to load one.");
    }

    loop {
        output.prompt();

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            output.newline();
            break;
        }

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Help => output.hint(HELP),
            Input::ClearHistory => {
                session.clear_history();
                output.info("Conversation cleared.");
            }
            Input::Reset => {
                session.clear_document();
                session.clear_history();
                output.info("Document and conversation cleared.");
            }
            Input::History => {
                if session.history().is_empty() {
                    output.info("No messages yet.");
                }
                for message in session.history() {
                    output.message(message.role, &message.content);
                }
            }
            Input::Load("") => output.warning("Usage: /load <path>"),
            Input::Load(path) => match session.load_file(path) {
                Ok(0) => output.warning(&format!("{} contains no text", path)),
                Ok(chunks) => {
                    session.clear_history();
                    output.success(&format!("Loaded {} ({} chunks)", path, chunks));
                }
                Err(e) => output.error(&format!("Error processing document: {}", e)),
            },
            Input::Question(question) => {
                if !session.has_document() {
                    output.warning("Load a document first with /load <path>.");
                    continue;
                }
                let reply = session.ask(question).await;
                output.message(MessageRole::Assistant, &reply);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatManager;
    use crate::llm::LLMClient;
    use crate::rag::{ChunkingOptions, DocumentProcessor};
    use crate::types::ChatMessage;
    use async_trait::async_trait;
    use std::io::Cursor;

    struct FixedClient;

    #[async_trait]
    impl LLMClient for FixedClient {
        async fn generate_with_history(&self, _messages: &[ChatMessage]) -> Result<String> {
            Ok("It ran.".to_string())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    fn session() -> ChatSession {
        ChatSession::new(
            DocumentProcessor::new(ChunkingOptions::new(15, 5)).unwrap(),
            ChatManager::new(),
            Box::new(FixedClient),
            2,
        )
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("   \n"), Input::Empty);
        assert_eq!(parse_input("exit\n"), Input::Quit);
        assert_eq!(parse_input("clear"), Input::ClearHistory);
        assert_eq!(parse_input("/load  a b.pdf "), Input::Load("a b.pdf"));
        assert_eq!(parse_input("/load"), Input::Load(""));
        assert_eq!(parse_input("/loader"), Input::Question("/loader"));
        assert_eq!(
            parse_input("What did the dog do?"),
            Input::Question("What did the dog do?")
        );
    }

    #[tokio::test]
    async fn test_questions_without_document_are_skipped() {
        let mut session = session();
        let input = Cursor::new("What happened?\nquit\n");

        run_chat(&mut session, input, &Output::no_color())
            .await
            .unwrap();
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_chat_loop_answers_until_eof() {
        let mut session = session();
        session.load_text("The cat sat. The dog ran.").unwrap();
        let input = Cursor::new("What did the dog do?\n\n/history\n");

        run_chat(&mut session, input, &Output::no_color())
            .await
            .unwrap();
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[1].content, "It ran.");
    }

    #[tokio::test]
    async fn test_load_and_reset_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "The bird flew. The fish swam.").unwrap();

        let mut session = session();
        let script = format!("/load {}\nclear\n", path.display());
        run_chat(&mut session, Cursor::new(script), &Output::no_color())
            .await
            .unwrap();
        assert!(session.has_document());

        run_chat(&mut session, Cursor::new("/reset\n"), &Output::no_color())
            .await
            .unwrap();
        assert!(!session.has_document());
    }
}
