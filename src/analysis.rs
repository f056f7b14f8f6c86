use std::borrow::Cow;

use serde::Serialize;
use tracing::{error, info};

use crate::config::AnalyzerSettings;
use crate::errors::{ErrorKind, chat_error_message};
use crate::lang::{Language, LanguageDetector};
use crate::llm::client::ChatClient;
use crate::llm::types::{ChatMessage, CompletionRequest};
use crate::prompt::{self, OutputMode};

/// Longest document excerpt, in characters, sent to the backend.
pub const MAX_INPUT_CHARS: usize = 8000;
pub const TRUNCATION_MARKER: &str = "... [text truncated]";

pub const TEMPERATURE: f32 = 0.4;
pub const MONOLINGUAL_MAX_TOKENS: u32 = 2500;
/// Every bilingual line carries both languages, so the ceiling is higher.
pub const BILINGUAL_MAX_TOKENS: u32 = 3500;

const EMPTY_INPUT_MESSAGE: &str = "No text provided";

pub const DISCLAIMER_EN: &str = "This analysis is for informational purposes only and is not a substitute for professional medical advice, diagnosis, or treatment. Always consult with a qualified healthcare provider for medical concerns.";
pub const DISCLAIMER_ZH: &str = "此分析仅供信息参考，不能替代专业医疗建议、诊断或治疗。如有医疗问题，请务必咨询合格的医疗保健提供者。";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLanguage {
    En,
    Zh,
    Bilingual,
}

impl ReportLanguage {
    fn resolve(mode: OutputMode, language: Language) -> Self {
        match (mode, language) {
            (OutputMode::Bilingual, _) => ReportLanguage::Bilingual,
            (OutputMode::Monolingual, Language::En) => ReportLanguage::En,
            (OutputMode::Monolingual, Language::Zh) => ReportLanguage::Zh,
        }
    }

    pub fn disclaimer(self) -> String {
        match self {
            ReportLanguage::En => DISCLAIMER_EN.to_string(),
            ReportLanguage::Zh => DISCLAIMER_ZH.to_string(),
            ReportLanguage::Bilingual => format!("{DISCLAIMER_ZH} {DISCLAIMER_EN}"),
        }
    }
}

/// Result of one analysis call.
///
/// On success `analysis` and `disclaimer` are set and `error` is not;
/// on failure `error` and `error_kind` are set and `analysis` is not.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub language: ReportLanguage,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disclaimer: Option<String>,
}

impl AnalysisResult {
    fn succeeded(analysis: String, language: ReportLanguage, model: &str) -> Self {
        Self {
            success: true,
            analysis: Some(analysis),
            error: None,
            error_kind: None,
            language,
            model: model.to_string(),
            disclaimer: Some(language.disclaimer()),
        }
    }

    fn failed(kind: ErrorKind, message: String, language: ReportLanguage, model: &str) -> Self {
        Self {
            success: false,
            analysis: None,
            error: Some(message),
            error_kind: Some(kind),
            language,
            model: model.to_string(),
            disclaimer: None,
        }
    }
}

/// Turns document text into a structured clinical interpretation via a
/// chat-completion backend. Holds no per-request state.
pub struct Analyzer<C> {
    client: C,
    mode: OutputMode,
    detector: LanguageDetector,
}

impl<C: ChatClient> Analyzer<C> {
    pub fn new(client: C, settings: AnalyzerSettings) -> Self {
        Self {
            client,
            mode: settings.mode,
            detector: LanguageDetector::with_threshold(settings.cjk_threshold),
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub fn detector(&self) -> &LanguageDetector {
        &self.detector
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn analyze(&self, text: &str, language: Option<Language>) -> AnalysisResult {
        if text.trim().is_empty() {
            let language = ReportLanguage::resolve(self.mode, language.unwrap_or(Language::En));
            return AnalysisResult::failed(
                ErrorKind::EmptyInput,
                EMPTY_INPUT_MESSAGE.to_string(),
                language,
                self.model(),
            );
        }

        let language = match language {
            Some(lang) => lang,
            None => {
                let detected = self.detector.detect(text);
                info!(language = %detected, "detected document language");
                detected
            }
        };
        let report_language = ReportLanguage::resolve(self.mode, language);

        let excerpt = truncate(text, MAX_INPUT_CHARS);
        let prompt = prompt::build(&excerpt, language, self.mode);
        let request = CompletionRequest {
            messages: vec![ChatMessage::system(prompt.system), ChatMessage::user(prompt.user)],
            temperature: TEMPERATURE,
            max_tokens: max_tokens(self.mode),
        };

        match self.client.complete(&request).await {
            Ok(content) => {
                info!(
                    model = %self.model(),
                    language = ?report_language,
                    chars = content.chars().count(),
                    "analysis complete"
                );
                AnalysisResult::succeeded(content.trim().to_string(), report_language, self.model())
            }
            Err(e) => {
                error!(error = %e, "AI analysis failed");
                AnalysisResult::failed(
                    ErrorKind::BackendFailure,
                    chat_error_message(&e),
                    report_language,
                    self.model(),
                )
            }
        }
    }
}

pub fn max_tokens(mode: OutputMode) -> u32 {
    match mode {
        OutputMode::Monolingual => MONOLINGUAL_MAX_TOKENS,
        OutputMode::Bilingual => BILINGUAL_MAX_TOKENS,
    }
}

/// Cuts `text` to at most `max_chars` characters, appending
/// [`TRUNCATION_MARKER`] when anything was removed.
pub fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => Cow::Owned(format!("{}{TRUNCATION_MARKER}", &text[..byte_idx])),
        None => Cow::Borrowed(text),
    }
}
