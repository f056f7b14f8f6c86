//! Extract → detect → prompt → analyze, as one request-scoped state machine.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisResult, Analyzer};
use crate::errors::ErrorKind;
use crate::extract::{self, DocumentFormat, ExtractError, ExtractionResult};
use crate::lang::Language;
use crate::llm::client::ChatClient;

/// Characters of extracted text an upload forwards to analysis.
pub const UPLOAD_ANALYSIS_CHARS: usize = 3000;
pub const PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Received,
    Extracting,
    ExtractFailed,
    Extracted,
    Analyzing,
    AnalyzeFailed,
    Complete,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Stage::ExtractFailed | Stage::AnalyzeFailed | Stage::Complete
        )
    }
}

/// Per-request knobs supplied by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOptions {
    pub language: Option<Language>,
    /// Keep only the first this-many characters of extracted text, unmarked.
    pub max_chars: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub stage: Stage,
    pub extraction: ExtractionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
}

impl PipelineOutcome {
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.extraction
            .error_kind
            .or_else(|| self.analysis.as_ref().and_then(|a| a.error_kind))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file selected")]
    MissingFileName,

    #[error("File type .{0} not allowed. Use: pdf, docx, doc")]
    DisallowedType(String),

    #[error("could not stage upload: {0}")]
    Staging(#[from] std::io::Error),

    #[error("Document parsing failed: {message}")]
    Extraction { kind: ErrorKind, message: String },
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::MissingFileName | UploadError::DisallowedType(_) => {
                ErrorKind::UnsupportedFormat
            }
            UploadError::Staging(_) => ErrorKind::ExtractionFailure,
            UploadError::Extraction { kind, .. } => *kind,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub filename: String,
    pub file_size: u64,
    pub text_preview: String,
    pub text_length: usize,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
}

/// Reads text from the document at `path` on the blocking pool.
pub async fn extract_text(path: impl AsRef<Path>) -> ExtractionResult {
    let path = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || extract::extract_text(&path))
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "extraction task did not complete");
            ExtractionResult::failed(&ExtractError::Aborted(e.to_string()))
        })
}

pub struct Pipeline<C> {
    analyzer: Analyzer<C>,
    staging_dir: Option<PathBuf>,
}

impl<C: ChatClient> Pipeline<C> {
    pub fn new(analyzer: Analyzer<C>) -> Self {
        Self {
            analyzer,
            staging_dir: None,
        }
    }

    /// Stage uploads under `dir` instead of the system temp directory.
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    pub fn analyzer(&self) -> &Analyzer<C> {
        &self.analyzer
    }

    pub async fn analyze_medical_text(
        &self,
        text: &str,
        language: Option<Language>,
    ) -> AnalysisResult {
        self.analyzer.analyze(text, language).await
    }

    /// Runs the full pipeline on a document already on disk. The first
    /// failing stage ends the request; nothing is retried here.
    pub async fn process_file(&self, path: &Path, options: RequestOptions) -> PipelineOutcome {
        let mut stage = Stage::Received;
        advance(&mut stage, Stage::Extracting, path);

        let extraction = extract_text(path).await;
        let Some(text) = extraction.text.as_deref() else {
            advance(&mut stage, Stage::ExtractFailed, path);
            return PipelineOutcome {
                stage,
                extraction,
                analysis: None,
            };
        };
        advance(&mut stage, Stage::Extracted, path);

        let excerpt = match options.max_chars {
            Some(limit) => head_chars(text, limit),
            None => text,
        };

        advance(&mut stage, Stage::Analyzing, path);
        let analysis = self.analyzer.analyze(excerpt, options.language).await;
        let terminal = if analysis.success {
            Stage::Complete
        } else {
            Stage::AnalyzeFailed
        };
        advance(&mut stage, terminal, path);

        PipelineOutcome {
            stage,
            extraction,
            analysis: Some(analysis),
        }
    }

    /// Handles an uploaded document: stages the bytes in a temporary file,
    /// extracts, and analyzes the first [`UPLOAD_ANALYSIS_CHARS`] characters.
    ///
    /// The temporary file is removed on every return path.
    pub async fn process_upload(
        &self,
        filename: &str,
        bytes: &[u8],
        language: Option<Language>,
    ) -> Result<UploadReport, UploadError> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(UploadError::MissingFileName);
        }
        let ext = Path::new(filename)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if DocumentFormat::from_extension(&ext).is_none() {
            return Err(UploadError::DisallowedType(ext));
        }

        let suffix = format!(".{ext}");
        let mut builder = tempfile::Builder::new();
        builder.prefix("meddoc-upload-").suffix(&suffix);
        let staged = match &self.staging_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        staged.as_file().write_all(bytes)?;
        staged.as_file().sync_all()?;
        let file_size = staged.as_file().metadata()?.len();
        debug!(filename, file_size, path = %staged.path().display(), "upload staged");

        let outcome = self
            .process_file(
                staged.path(),
                RequestOptions {
                    language,
                    max_chars: Some(UPLOAD_ANALYSIS_CHARS),
                },
            )
            .await;
        drop(staged);

        let text = match outcome.extraction.text {
            Some(text) => text,
            None => {
                return Err(UploadError::Extraction {
                    kind: outcome
                        .extraction
                        .error_kind
                        .unwrap_or(ErrorKind::ExtractionFailure),
                    message: outcome.extraction.error.unwrap_or_default(),
                });
            }
        };

        let (analysis, analysis_error) = match outcome.analysis {
            Some(result) if result.success => (Some(result), None),
            Some(result) => (None, result.error),
            None => (None, None),
        };

        info!(filename, stage = ?outcome.stage, chars = text.chars().count(), "upload processed");
        Ok(UploadReport {
            filename: filename.to_string(),
            file_size,
            text_preview: preview(&text, PREVIEW_CHARS),
            text_length: text.chars().count(),
            stage: outcome.stage,
            analysis,
            analysis_error,
        })
    }
}

fn advance(stage: &mut Stage, next: Stage, path: &Path) {
    debug!(from = ?*stage, to = ?next, path = %path.display(), "pipeline stage");
    *stage = next;
}

fn head_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Paths of the documents, resolved relative to the working directory.
pub fn resolve_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .map(|p| std::path::absolute(p).unwrap_or_else(|_| p.clone()))
        .collect()
}
