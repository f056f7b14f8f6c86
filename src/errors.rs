use serde::{Deserialize, Serialize};

use crate::extract::ExtractError;
use crate::llm::client::ChatError;

/// Failure categories surfaced to callers of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    UnsupportedFormat,
    ExtractionFailure,
    EmptyInput,
    BackendFailure,
}

impl ErrorKind {
    /// Whether the caller supplied something unusable, as opposed to a fault
    /// in a parser or the backend.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            ErrorKind::NotFound | ErrorKind::UnsupportedFormat | ErrorKind::EmptyInput
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::ExtractionFailure => "extraction_failure",
            ErrorKind::EmptyInput => "empty_input",
            ErrorKind::BackendFailure => "backend_failure",
        })
    }
}

pub(crate) fn extract_error_kind(e: &ExtractError) -> ErrorKind {
    match e {
        ExtractError::NotFound(_) => ErrorKind::NotFound,
        ExtractError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
        ExtractError::Io(_) | ExtractError::Pdf(_) | ExtractError::Aborted(_) => {
            ErrorKind::ExtractionFailure
        }
    }
}

/// Human-readable message for a backend failure, with a hint where one helps.
pub(crate) fn chat_error_message(e: &ChatError) -> String {
    match e {
        ChatError::Unauthorized(_) => {
            format!("AI analysis failed: {e} (check DEEPSEEK_API_KEY)")
        }
        ChatError::RateLimited => format!("AI analysis failed: {e} (retriable)"),
        _ => format!("AI analysis failed: {e}"),
    }
}
