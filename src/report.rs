//! Parsing of the seven-section analysis the backend is asked to produce.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::lang::{Language, is_cjk};
use crate::prompt::{BILINGUAL_SEPARATOR, OutputMode, SECTIONS};

/// `1. 📊 **Key Values**`, optionally behind a Markdown heading marker.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:#{1,6}\s*)?(\d{1,2})\.\s*(\S+)\s*\*\*(.+?)\*\*\s*:?\s*$")
        .expect("header regex")
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSection {
    pub number: u8,
    pub emoji: String,
    pub title: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub sections: Vec<ParsedSection>,
    /// Non-bullet lines outside any header, e.g. a stray introduction.
    pub stray_lines: Vec<String>,
}

impl Report {
    /// Seven sections numbered 1–7 in order, each with the expected emoji.
    pub fn is_complete(&self) -> bool {
        self.sections.len() == SECTIONS.len()
            && self
                .sections
                .iter()
                .zip(SECTIONS.iter())
                .all(|(parsed, expected)| {
                    parsed.number == expected.number && same_emoji(&parsed.emoji, expected.emoji)
                })
    }

    /// Like [`Report::is_complete`], and every title matches the template for
    /// `mode`/`language`.
    pub fn matches_catalogue(&self, mode: OutputMode, language: Language) -> bool {
        self.is_complete()
            && self
                .sections
                .iter()
                .zip(SECTIONS.iter())
                .all(|(parsed, expected)| parsed.title == expected.title(mode, language))
    }

    pub fn section(&self, number: u8) -> Option<&ParsedSection> {
        self.sections.iter().find(|s| s.number == number)
    }
}

/// Equal once U+FE0F (emoji presentation selector) is ignored on both sides.
fn same_emoji(a: &str, b: &str) -> bool {
    let plain = |s: &str| s.chars().filter(|&c| c != '\u{FE0F}').collect::<String>();
    plain(a) == plain(b)
}

pub fn parse_sections(analysis: &str) -> Report {
    let mut report = Report::default();

    for line in analysis.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(caps) = HEADER_RE.captures(trimmed)
            && let Ok(number) = caps[1].parse::<u8>()
        {
            report.sections.push(ParsedSection {
                number,
                emoji: caps[2].to_string(),
                title: caps[3].trim().to_string(),
                bullets: Vec::new(),
            });
            continue;
        }

        let bullet = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
            .or_else(|| trimmed.strip_prefix("• "));

        match (bullet, report.sections.last_mut()) {
            (Some(text), Some(section)) => section.bullets.push(text.trim().to_string()),
            _ => report.stray_lines.push(trimmed.to_string()),
        }
    }

    report
}

/// Number of section header lines in `analysis`.
pub fn count_section_headers(analysis: &str) -> usize {
    analysis
        .lines()
        .filter(|line| HEADER_RE.is_match(line.trim()))
        .count()
}

/// Removes bold, underline and code markers the model was told not to use.
pub fn strip_inline_formatting(text: &str) -> String {
    text.replace("**", "").replace("__", "").replace('`', "")
}

/// Splits a bilingual line into its English and Chinese halves.
///
/// The split happens at the first separator followed by Chinese text, so
/// units such as `mg/dL` and English-side slashes are left intact.
pub fn split_bilingual(line: &str) -> (&str, Option<&str>) {
    for (idx, _) in line.match_indices(BILINGUAL_SEPARATOR) {
        let rest = &line[idx + BILINGUAL_SEPARATOR.len()..];
        if rest.chars().any(is_cjk) {
            return (line[..idx].trim_end(), Some(rest.trim_start()));
        }
    }
    (line, None)
}
