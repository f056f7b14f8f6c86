//! Document text extraction: PDF (two engines) and Word.

pub mod docx;
pub mod pdf;

#[cfg(test)]
pub(crate) mod fixtures;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error};

use crate::errors::{ErrorKind, extract_error_kind};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("extraction aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Word,
}

impl DocumentFormat {
    /// Maps a lowercase extension without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" | "doc" => Some(DocumentFormat::Word),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        Self::from_extension(&ext).ok_or_else(|| {
            let shown = if ext.is_empty() {
                "(none)".to_string()
            } else {
                format!(".{ext}")
            };
            ExtractError::UnsupportedFormat(shown)
        })
    }
}

/// Outcome of one extraction call. Exactly one of `text` and `error` is set.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl ExtractionResult {
    pub fn ok(text: String) -> Self {
        Self {
            text: Some(text),
            error: None,
            error_kind: None,
        }
    }

    pub fn failed(e: &ExtractError) -> Self {
        Self {
            text: None,
            error: Some(e.to_string()),
            error_kind: Some(extract_error_kind(e)),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.text.is_some()
    }
}

impl From<Result<String, ExtractError>> for ExtractionResult {
    fn from(result: Result<String, ExtractError>) -> Self {
        match result {
            Ok(text) => Self::ok(text),
            Err(e) => Self::failed(&e),
        }
    }
}

/// Extracts plain text from the document at `path`. Never panics or returns
/// a raw fault: every failure is folded into the result's `error` field.
pub fn extract_text(path: &Path) -> ExtractionResult {
    let result = extract(path);
    if let Err(e) = &result {
        error!(path = %path.display(), error = %e, "text extraction failed");
    }
    result.into()
}

/// Typed variant of [`extract_text`].
pub fn extract(path: &Path) -> Result<String, ExtractError> {
    if !path.is_file() {
        return Err(ExtractError::NotFound(path.to_path_buf()));
    }

    let format = DocumentFormat::from_path(path)?;
    let bytes = std::fs::read(path).map_err(|e| read_error(path, e))?;
    let text = match format {
        DocumentFormat::Pdf => pdf::extract_pdf_text(&bytes)?,
        DocumentFormat::Word => docx::extract_word_text(&bytes),
    };

    debug!(path = %path.display(), ?format, chars = text.chars().count(), "document extracted");
    Ok(text)
}

/// A file that vanished or cannot be opened counts as missing.
fn read_error(path: &Path, e: std::io::Error) -> ExtractError {
    match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
            ExtractError::NotFound(path.to_path_buf())
        }
        _ => ExtractError::Io(e),
    }
}
