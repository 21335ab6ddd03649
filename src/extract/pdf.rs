use lopdf::Document as PdfDocument;
use tracing::warn;

use crate::types::{AppError, Result};

/// Text of every page in page order, one page per line block.
pub(super) fn extract(bytes: &[u8]) -> Result<String> {
    let doc = PdfDocument::load_mem(bytes)
        .map_err(|e| AppError::Extraction(format!("Failed to parse PDF: {}", e)))?;

    let mut pages = Vec::new();
    let mut errors = 0usize;
    for page_num in doc.get_pages().into_keys() {
        match doc.extract_text(&[page_num]) {
            Ok(text) => pages.push(text.trim_end().to_string()),
            Err(e) => {
                warn!(page = page_num, error = %e, "Failed to extract text from PDF page");
                errors += 1;
            }
        }
    }

    if pages.is_empty() && errors > 0 {
        return Err(AppError::Extraction(format!(
            "No extractable text in PDF ({} pages failed)",
            errors
        )));
    }

    Ok(pages.join("\n"))
}
