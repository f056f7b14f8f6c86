//! Prompt construction for clinical document analysis.

mod templates;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::lang::Language;
use templates::{
    BILINGUAL_SYSTEM, BILINGUAL_USER, CHINESE_SYSTEM, CHINESE_USER, DOCUMENT_PLACEHOLDER,
    ENGLISH_SYSTEM, ENGLISH_USER,
};

/// Separator between the English and Chinese halves of a bilingual line.
pub const BILINGUAL_SEPARATOR: &str = " / ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Prompts and output in the document's own language.
    Monolingual,
    /// Every line carries English, then Chinese.
    #[default]
    Bilingual,
}

impl OutputMode {
    pub fn from_flag(bilingual: bool) -> Self {
        if bilingual {
            OutputMode::Bilingual
        } else {
            OutputMode::Monolingual
        }
    }

    pub fn is_bilingual(self) -> bool {
        self == OutputMode::Bilingual
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputMode::Monolingual => "monolingual",
            OutputMode::Bilingual => "bilingual",
        })
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monolingual" | "mono" => Ok(OutputMode::Monolingual),
            "bilingual" | "bi" => Ok(OutputMode::Bilingual),
            other => Err(format!("unknown output mode: {other}")),
        }
    }
}

/// One of the seven fixed report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub number: u8,
    pub emoji: &'static str,
    pub title_en: &'static str,
    pub title_zh: &'static str,
}

impl Section {
    /// Header line as the model is asked to emit it, e.g. `1. 📊 **Key Values**`.
    pub fn header(&self, mode: OutputMode, language: Language) -> String {
        format!("{}. {} **{}**", self.number, self.emoji, self.title(mode, language))
    }

    pub fn title(&self, mode: OutputMode, language: Language) -> String {
        match (mode, language) {
            (OutputMode::Bilingual, _) => {
                format!("{}{BILINGUAL_SEPARATOR}{}", self.title_en, self.title_zh)
            }
            (OutputMode::Monolingual, Language::En) => self.title_en.to_string(),
            (OutputMode::Monolingual, Language::Zh) => self.title_zh.to_string(),
        }
    }
}

pub const SECTIONS: [Section; 7] = [
    Section {
        number: 1,
        emoji: "📊",
        title_en: "Key Values",
        title_zh: "关键数值",
    },
    Section {
        number: 2,
        emoji: "🔍",
        title_en: "Abnormalities & Significance",
        title_zh: "异常发现与意义",
    },
    Section {
        number: 3,
        emoji: "🏥",
        title_en: "Possible Diagnosis",
        title_zh: "可能的诊断方向",
    },
    Section {
        number: 4,
        emoji: "💊",
        title_en: "Current Treatment Status",
        title_zh: "当前治疗状态",
    },
    Section {
        number: 5,
        emoji: "⚠️",
        title_en: "Urgency & Follow-Up",
        title_zh: "紧迫性与随访",
    },
    Section {
        number: 6,
        emoji: "❓",
        title_en: "Questions to Ask Your Doctor",
        title_zh: "向医生提问",
    },
    Section {
        number: 7,
        emoji: "📋",
        title_en: "Recommendations",
        title_zh: "建议",
    },
];

/// Number of questions the model must list in section 6.
pub const DOCTOR_QUESTION_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Builds the system and user instructions for `text`.
///
/// Bilingual mode uses one shared template whatever `language` is;
/// monolingual mode picks the template matching `language`.
pub fn build(text: &str, language: Language, mode: OutputMode) -> PromptPair {
    let (system, user) = match (mode, language) {
        (OutputMode::Bilingual, _) => (BILINGUAL_SYSTEM, BILINGUAL_USER),
        (OutputMode::Monolingual, Language::En) => (ENGLISH_SYSTEM, ENGLISH_USER),
        (OutputMode::Monolingual, Language::Zh) => (CHINESE_SYSTEM, CHINESE_USER),
    };

    PromptPair {
        system: system.to_string(),
        user: user.replacen(DOCUMENT_PLACEHOLDER, text, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARIANTS: [(OutputMode, Language); 4] = [
        (OutputMode::Bilingual, Language::En),
        (OutputMode::Bilingual, Language::Zh),
        (OutputMode::Monolingual, Language::En),
        (OutputMode::Monolingual, Language::Zh),
    ];

    #[test]
    fn every_template_lists_seven_sections_in_order() {
        for (mode, lang) in ALL_VARIANTS {
            let prompt = build("doc", lang, mode);
            let mut last = 0;
            for section in &SECTIONS {
                let header = section.header(mode, lang);
                let pos = prompt
                    .user
                    .find(&header)
                    .unwrap_or_else(|| panic!("{mode}/{lang}: missing {header}"));
                assert!(pos > last, "{mode}/{lang}: {header} out of order");
                last = pos;
            }
        }
    }

    #[test]
    fn document_text_is_embedded_once() {
        for (mode, lang) in ALL_VARIANTS {
            let prompt = build("LDL-C 162 mg/dL", lang, mode);
            assert_eq!(prompt.user.matches("LDL-C 162 mg/dL").count(), 1);
            assert!(!prompt.user.contains(DOCUMENT_PLACEHOLDER));
        }
    }

    #[test]
    fn placeholder_inside_document_is_left_alone() {
        let prompt = build("literal {document} token", Language::En, OutputMode::Monolingual);
        assert!(prompt.user.contains("literal {document} token"));
    }

    #[test]
    fn bilingual_ignores_detected_language() {
        assert_eq!(
            build("x", Language::En, OutputMode::Bilingual),
            build("x", Language::Zh, OutputMode::Bilingual)
        );
    }

    #[test]
    fn bilingual_requires_english_first_separator() {
        let prompt = build("x", Language::En, OutputMode::Bilingual);
        assert!(prompt.system.contains("English must come FIRST"));
        assert!(prompt.system.contains("separated by \" / \""));
        assert!(prompt.user.contains("1. 📊 **Key Values / 关键数值**"));
    }

    #[test]
    fn monolingual_templates_are_single_language() {
        let en = build("x", Language::En, OutputMode::Monolingual);
        assert!(en.system.contains("Respond in English"));
        assert!(!en.user.contains("关键数值"));

        let zh = build("x", Language::Zh, OutputMode::Monolingual);
        assert!(zh.system.contains("必须使用中文回答"));
        assert!(!zh.user.contains("Key Values"));
    }

    #[test]
    fn formatting_and_lipid_rules_present_in_all_templates() {
        for (mode, lang) in ALL_VARIANTS {
            let prompt = build("x", lang, mode);
            assert!(prompt.user.contains("2-4"), "{mode}/{lang}: bullet count rule");
            assert!(prompt.user.contains("<130 mg/dL"), "{mode}/{lang}: general target");
            assert!(prompt.user.contains("<100 mg/dL"), "{mode}/{lang}: high-risk target");
            assert!(prompt.user.contains("<70 mg/dL"), "{mode}/{lang}: CHD target");
            assert!(prompt.system.contains("**"), "{mode}/{lang}: bold-title rule");
        }
    }

    #[test]
    fn section_six_asks_for_five_questions() {
        for (mode, lang) in ALL_VARIANTS {
            let prompt = build("x", lang, mode);
            let start = prompt.user.find(&SECTIONS[5].header(mode, lang)).unwrap();
            let end = prompt.user.find(&SECTIONS[6].header(mode, lang)).unwrap();
            let bullets = prompt.user[start..end]
                .lines()
                .filter(|l| l.starts_with("- "))
                .count();
            assert_eq!(bullets, DOCTOR_QUESTION_COUNT, "{mode}/{lang}");
        }
    }

    #[test]
    fn parses_output_modes() {
        assert_eq!("Bilingual".parse::<OutputMode>().unwrap(), OutputMode::Bilingual);
        assert_eq!("mono".parse::<OutputMode>().unwrap(), OutputMode::Monolingual);
        assert!("both".parse::<OutputMode>().is_err());
        assert_eq!(OutputMode::from_flag(false), OutputMode::Monolingual);
    }
}
