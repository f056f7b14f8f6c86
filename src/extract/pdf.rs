use std::panic::{AssertUnwindSafe, catch_unwind};

use lopdf::Document;
use tracing::{debug, error, warn};

use super::ExtractError;

/// Extracts text page by page with `pdf-extract`, falling back to lopdf's own
/// text extraction when the primary engine fails or finds only whitespace.
///
/// An error is returned only when both engines fail to parse the document.
/// A document that parses but contains no text yields an empty string.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    extract_with(bytes, extract_with_pdf_extract, extract_with_lopdf)
}

type Engine = fn(&[u8]) -> Result<Vec<String>, String>;

fn extract_with(bytes: &[u8], primary: Engine, fallback: Engine) -> Result<String, ExtractError> {
    let primary_err = match primary(bytes) {
        Ok(pages) => {
            if pages.iter().any(|p| !p.trim().is_empty()) {
                return Ok(join_pages(&pages));
            }
            debug!(pages = pages.len(), "primary PDF engine found no text");
            None
        }
        Err(e) => {
            warn!(error = %e, "primary PDF engine failed, trying fallback");
            Some(e)
        }
    };

    match fallback(bytes) {
        Ok(pages) => Ok(join_pages(&pages)),
        Err(e) => {
            error!(error = %e, "fallback PDF engine failed");
            match primary_err {
                Some(primary) => Err(ExtractError::Pdf(format!("{primary}; fallback: {e}"))),
                None => Ok(String::new()),
            }
        }
    }
}

pub(crate) fn extract_with_pdf_extract(bytes: &[u8]) -> Result<Vec<String>, String> {
    // pdf-extract panics on some malformed font programs
    catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| "pdf-extract panicked while parsing document".to_string())?
    .map_err(|e| e.to_string())
}

pub(crate) fn extract_with_lopdf(bytes: &[u8]) -> Result<Vec<String>, String> {
    let doc = Document::load_mem(bytes).map_err(|e| e.to_string())?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().into_keys() {
        match doc.extract_text(&[page_number]) {
            Ok(text) if !text.trim().is_empty() => pages.push(text),
            Ok(_) => {}
            Err(e) => warn!(page = page_number, error = %e, "lopdf could not read page"),
        }
    }
    Ok(pages)
}

fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|p| p.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
