//! Plain-text extraction from uploaded documents.
//!
//! The retrieval core only ever sees a string; this module turns document
//! bytes of a declared [`DocumentType`] into that string.

mod docx;
mod pdf;

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{AppError, Result};

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    Pdf,
    Docx,
    PlainText,
}

impl FromStr for DocumentType {
    type Err = AppError;

    /// Parse a file extension (with or without the leading dot).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" | "text" | "md" => Ok(Self::PlainText),
            other => Err(AppError::UnsupportedFormat(format!(
                "'{}'. Please use PDF, DOCX or plain text files",
                other
            ))),
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::PlainText => "plain-text",
        };
        write!(f, "{}", name)
    }
}

impl DocumentType {
    /// Detect the document type from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                AppError::UnsupportedFormat(format!(
                    "{} has no file extension",
                    path.display()
                ))
            })?
            .parse()
    }
}

/// Extract the plain text of a document.
///
/// # Errors
///
/// Returns [`AppError::Extraction`] if the bytes cannot be decoded as the
/// declared type.
pub fn extract_text(bytes: &[u8], document_type: DocumentType) -> Result<String> {
    match document_type {
        DocumentType::Pdf => pdf::extract(bytes),
        DocumentType::Docx => docx::extract(bytes),
        DocumentType::PlainText => extract_plain_text(bytes),
    }
}

fn extract_plain_text(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec())
        .map_err(|e| AppError::Extraction(format!("Text file is not valid UTF-8: {}", e)))
}
