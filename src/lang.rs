use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Share of CJK characters above which a document is treated as Chinese.
pub const DEFAULT_CJK_THRESHOLD: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown language tag: {0} (expected \"en\" or \"zh\")")]
pub struct UnknownLanguage(String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            other => Err(UnknownLanguage(other.to_string())),
        }
    }
}

/// Character-ratio language classifier.
///
/// A threshold of `0.0` turns the detector into an "any CJK character" test.
#[derive(Debug, Clone, Copy)]
pub struct LanguageDetector {
    threshold: f64,
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CJK_THRESHOLD,
        }
    }
}

impl LanguageDetector {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn any_cjk() -> Self {
        Self::with_threshold(0.0)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn detect(&self, text: &str) -> Language {
        let (cjk, total) = text.chars().fold((0usize, 0usize), |(cjk, total), c| {
            (cjk + usize::from(is_cjk(c)), total + 1)
        });

        if total == 0 {
            return Language::En;
        }

        if cjk as f64 / total as f64 > self.threshold {
            Language::Zh
        } else {
            Language::En
        }
    }
}

/// Classifies `text` with the default threshold.
pub fn detect(text: &str) -> Language {
    LanguageDetector::default().detect(text)
}

/// CJK unified ideographs, extensions A–E and the compatibility blocks.
pub fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}' |
        '\u{3400}'..='\u{4DBF}' |
        '\u{20000}'..='\u{2A6DF}' |
        '\u{2A700}'..='\u{2B73F}' |
        '\u{2B740}'..='\u{2B81F}' |
        '\u{2B820}'..='\u{2CEAF}' |
        '\u{F900}'..='\u{FAFF}' |
        '\u{2F800}'..='\u{2FA1F}'
    )
}
