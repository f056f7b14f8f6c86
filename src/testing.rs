//! Test doubles shared across module tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::lang::Language;
use crate::llm::client::{ChatClient, ChatError};
use crate::llm::types::CompletionRequest;
use crate::prompt::{OutputMode, SECTIONS};

/// Scripted chat backend that records every request it receives.
pub(crate) struct MockChat {
    replies: Mutex<VecDeque<Result<String, ChatError>>>,
    fallback: Option<String>,
    echo: bool,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockChat {
    /// Answers every call with `reply`.
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: Some(reply.to_string()),
            echo: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_replies(replies: Vec<Result<String, ChatError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: None,
            echo: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing(error: ChatError) -> Self {
        Self::with_replies(vec![Err(error)])
    }

    /// Answers with the user prompt it was sent.
    pub(crate) fn echoing() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: None,
            echo: true,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn captured(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ChatClient for MockChat {
    fn model(&self) -> &str {
        "mock-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ChatError> {
        self.requests.lock().unwrap().push(request.clone());
        if self.echo {
            return Ok(request
                .messages
                .last()
                .map(|m| m.content.clone())
                .unwrap_or_default());
        }
        if let Some(reply) = self.replies.lock().unwrap().pop_front() {
            return reply;
        }
        self.fallback
            .clone()
            .ok_or(ChatError::MalformedResponse("no scripted reply left".into()))
    }
}

/// A well-formed seven-section analysis in the requested layout.
pub(crate) fn sample_analysis(mode: OutputMode, language: Language) -> String {
    let mut out = String::new();
    for section in &SECTIONS {
        out.push_str(&section.header(mode, language));
        out.push('\n');
        let bullets: &[&str] = match (mode, language, section.number) {
            (OutputMode::Bilingual, _, 1) => &[
                "LDL-C: 142 mg/dL (above general target <130 mg/dL) / 低密度脂蛋白胆固醇: 142 mg/dL (高于一般人群目标值 <130 mg/dL)",
                "Other values (ALT, AST) are normal / 其他正常值: ALT, AST",
            ],
            (OutputMode::Bilingual, _, _) => &[
                "Not specified in report / 报告中未说明",
                "Discuss with your physician / 与医生讨论",
            ],
            (_, Language::Zh, _) => &["报告中未说明", "请与医生讨论"],
            (_, Language::En, 1) => &["LDL-C: 142 mg/dL (above general target <130 mg/dL)"],
            (_, Language::En, _) => &["Not specified in report", "Discuss with your physician"],
        };
        for bullet in bullets {
            out.push_str("- ");
            out.push_str(bullet);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
