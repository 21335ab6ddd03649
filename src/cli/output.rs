//! Colored output helpers for the docchat CLI

use owo_colors::OwoColorize;
use std::io::{self, Write};

use crate::types::{MessageRole, RankedChunk};

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the docchat banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n  {} {}",
                "docchat".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
            );
            println!("  {}\n", "Chat with your document".bright_white());
        } else {
            println!("\n  docchat v{}", env!("CARGO_PKG_VERSION"));
            println!("  Chat with your document\n");
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            println!("  [WARN] {}", message);
        }
    }

    /// Print an error message to stderr
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("  {}", message.dimmed().italic());
        } else {
            println!("  [TIP] {}", message);
        }
    }

    /// Print one chunk of the chunk sequence
    pub fn chunk(&self, position: usize, text: &str) {
        let label = format!("[{}] {} chars", position, text.chars().count());
        if self.colored {
            println!("\n  {}", label.cyan().bold());
        } else {
            println!("\n  {}", label);
        }
        for line in text.lines() {
            println!("    {}", line);
        }
    }

    /// Print a retrieved chunk with its similarity score
    pub fn ranked_chunk(&self, rank: usize, chunk: &RankedChunk) {
        let label = format!("#{} chunk {} score {:.4}", rank, chunk.position, chunk.score);
        if self.colored {
            println!("\n  {}", label.cyan().bold());
        } else {
            println!("\n  {}", label);
        }
        for line in chunk.text.lines() {
            println!("    {}", line);
        }
    }

    /// Print one transcript message
    pub fn message(&self, role: MessageRole, content: &str) {
        if self.colored {
            let tag = match role {
                MessageRole::User => "you".bright_green().bold().to_string(),
                MessageRole::Assistant => "assistant".bright_cyan().bold().to_string(),
                MessageRole::System => "system".dimmed().to_string(),
            };
            println!("\n  {}\n{}\n", tag, indent(content));
        } else {
            println!("\n  {}:\n{}\n", role, indent(content));
        }
    }

    /// Print the input prompt without a newline
    pub fn prompt(&self) {
        if self.colored {
            print!("{} ", ">".bright_green().bold());
        } else {
            print!("> ");
        }
        io::stdout().flush().ok();
    }

    /// Print an empty line
    pub fn newline(&self) {
        println!();
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
