//! Document loading: turns a policy file into plain text.
//!
//! PDFs go through `pdf-extract`; `.txt` and `.md` files are read as UTF-8.

use std::path::{Path, PathBuf};

use leavedesk_core::error::IngestError;
use tracing::debug;

/// A loaded policy document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Identifier derived from the file stem (e.g. "leave_policy")
    pub id: String,
    pub source: PathBuf,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: PathBuf::new(),
            text: text.into(),
        }
    }
}

/// Load a document, choosing the extractor by file extension.
pub fn load_document(path: &Path) -> Result<Document, IngestError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let text = match extension.as_str() {
        "pdf" => pdf_extract::extract_text(path).map_err(|e| IngestError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?,
        "txt" | "md" | "markdown" => std::fs::read_to_string(path).map_err(|e| IngestError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?,
        _ => return Err(IngestError::UnsupportedFormat(path.to_path_buf())),
    };

    // pdf-extract separates pages with form feeds
    let text = text.replace('\x0c', "\n");
    if text.trim().is_empty() {
        return Err(IngestError::Empty(path.to_path_buf()));
    }

    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();

    debug!(path = %path.display(), chars = text.chars().count(), "Document loaded");

    Ok(Document {
        id,
        source: path.to_path_buf(),
        text,
    })
}
