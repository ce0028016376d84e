// WHY: Segmenter contract plus the configurable rule set behind the default strategy
// Any strategy producing ordered, trimmed, non-overlapping spans can stand in for RuleSegmenter

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use crate::span::TextSpan;

pub mod abbreviations;
pub mod normalization;
pub mod rule_detector;

pub use abbreviations::AbbreviationChecker;
pub use normalization::{normalize_sentence, normalize_sentence_into};
pub use rule_detector::RuleSegmenter;

/// Splits text into sentence spans
///
/// Implementations must return spans ordered by `start`, pairwise non-overlapping,
/// trimmed of surrounding whitespace, and must never fail: text without sentence
/// content yields an empty vector.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<TextSpan>;
}

impl<S: Segmenter + ?Sized> Segmenter for &S {
    fn segment(&self, text: &str) -> Vec<TextSpan> {
        (**self).segment(text)
    }
}

/// Configuration for sentence boundary detection rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationRules {
    /// Characters that can terminate a sentence
    pub terminal_punctuation: Vec<char>,
    /// Closing quotes and brackets kept with the sentence they follow
    pub closing_punctuation: Vec<char>,
    /// Period-terminated words that never end a sentence ("Dr.", "etc.")
    pub abbreviations: Vec<String>,
    /// Treat "J." and "U.S." style initials as abbreviations
    pub initials_are_abbreviations: bool,
    /// A terminal followed by a lowercase word does not end the sentence
    pub lowercase_continues_sentence: bool,
    /// A blank line always ends a sentence, punctuation or not
    pub split_on_blank_lines: bool,
}

impl Default for SegmentationRules {
    fn default() -> Self {
        Self {
            terminal_punctuation: vec!['.', '?', '!', '\u{2026}'],
            closing_punctuation: vec!['"', '\'', '\u{201D}', '\u{2019}', ')', ']', '}'],
            abbreviations: abbreviations::default_abbreviations(),
            initials_are_abbreviations: true,
            lowercase_continues_sentence: true,
            split_on_blank_lines: true,
        }
    }
}

impl SegmentationRules {
    /// Parse rules from JSON; omitted fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rules: Self = serde_json::from_str(json).context("Invalid segmentation rules JSON")?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load rules from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to load rules from {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.terminal_punctuation.is_empty() {
            anyhow::bail!("Segmentation rules need at least one terminal punctuation character");
        }
        if let Some(ch) = self
            .terminal_punctuation
            .iter()
            .chain(&self.closing_punctuation)
            .find(|ch| ch.is_whitespace() || ch.is_alphanumeric())
        {
            anyhow::bail!("Punctuation sets may not contain whitespace or alphanumerics: {:?}", ch);
        }
        Ok(())
    }
}

static DEFAULT_SEGMENTER: OnceLock<RuleSegmenter> = OnceLock::new();

/// Shared segmenter built from the default rules
pub fn default_segmenter() -> &'static RuleSegmenter {
    DEFAULT_SEGMENTER.get_or_init(|| {
        RuleSegmenter::new(SegmentationRules::default())
            .expect("default segmentation rules always compile")
    })
}

/// Segment `text` with the default rules
pub fn segment(text: &str) -> Vec<TextSpan> {
    default_segmenter().segment(text)
}
