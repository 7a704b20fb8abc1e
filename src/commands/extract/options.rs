use anyhow::{Context, Result};
use regex::Regex;

use super::segment::{MarkerPattern, PatternSource, Segmentation, segment};
use crate::cli::DedupeMode;
use crate::model::OptionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionPattern {
    Parenthesized,
    LetterDot,
    OptionWord,
}

impl PatternSource for OptionPattern {
    fn as_str(self) -> &'static str {
        match self {
            OptionPattern::Parenthesized => "parenthesized",
            OptionPattern::LetterDot => "letter_dot",
            OptionPattern::OptionWord => "option_word",
        }
    }
}

#[derive(Debug)]
pub struct OptionSegmenter {
    patterns: Vec<MarkerPattern<OptionPattern>>,
    min_text_chars: usize,
    dedupe: DedupeMode,
}

impl OptionSegmenter {
    pub fn new(min_text_chars: usize, dedupe: DedupeMode) -> Result<Self> {
        Ok(Self {
            patterns: vec![
                MarkerPattern {
                    source: OptionPattern::Parenthesized,
                    marker: Regex::new(r"(?i)\(([A-D])\)")
                        .context("failed to compile parenthesized option regex")?,
                },
                MarkerPattern {
                    source: OptionPattern::LetterDot,
                    marker: Regex::new(r"(?:^|[^\w(])([A-D])[.)]\s")
                        .context("failed to compile letter-dot option regex")?,
                },
                MarkerPattern {
                    source: OptionPattern::OptionWord,
                    marker: Regex::new(r"(?i)\bOption\s*([A-D])\b[.):]?")
                        .context("failed to compile option-word regex")?,
                },
            ],
            min_text_chars,
            dedupe,
        })
    }

    pub fn segment(&self, content: &str) -> Segmentation<OptionPattern> {
        let min_text_chars = self.min_text_chars;
        segment(
            content,
            &self.patterns,
            |label| label.to_ascii_uppercase(),
            |source, text| keep_option_text(source, text, min_text_chars),
            self.dedupe,
        )
    }

    pub fn extract(&self, content: &str) -> Vec<OptionRecord> {
        self.segment(content)
            .resolved
            .into_iter()
            .map(|candidate| OptionRecord::new(candidate.captured))
            .collect()
    }
}

// "(B)" is an unambiguous marker, so short answers such as "(B) 4" survive.
// Bare letters and "Option" markers also occur in prose and need real text.
fn keep_option_text(source: OptionPattern, text: &str, min_text_chars: usize) -> bool {
    match source {
        OptionPattern::Parenthesized => !text.is_empty(),
        OptionPattern::LetterDot | OptionPattern::OptionWord => {
            text.chars().count() > min_text_chars
        }
    }
}
