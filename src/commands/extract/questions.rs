use anyhow::{Context, Result};
use regex::Regex;

use super::segment::{MarkerPattern, PatternSource, Segmentation, segment};
use crate::cli::DedupeMode;
use crate::model::QuestionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionPattern {
    QPrefix,
    QuestionWord,
    BareNumber,
}

impl PatternSource for QuestionPattern {
    fn as_str(self) -> &'static str {
        match self {
            QuestionPattern::QPrefix => "q_prefix",
            QuestionPattern::QuestionWord => "question_word",
            QuestionPattern::BareNumber => "bare_number",
        }
    }
}

#[derive(Debug)]
pub struct QuestionSegmenter {
    patterns: Vec<MarkerPattern<QuestionPattern>>,
    min_content_chars: usize,
    dedupe: DedupeMode,
}

impl QuestionSegmenter {
    pub fn new(min_content_chars: usize, dedupe: DedupeMode) -> Result<Self> {
        Ok(Self {
            patterns: vec![
                MarkerPattern {
                    source: QuestionPattern::QPrefix,
                    marker: Regex::new(r"(?i)\bQ[.)]\s*([0-9]+)[.)]?")
                        .context("failed to compile Q-prefix marker regex")?,
                },
                MarkerPattern {
                    source: QuestionPattern::QuestionWord,
                    marker: Regex::new(r"(?i)\bQuestion\s*([0-9]+)[.):]?")
                        .context("failed to compile question-word marker regex")?,
                },
                MarkerPattern {
                    source: QuestionPattern::BareNumber,
                    marker: Regex::new(r"(?:^|[^\w.])([0-9]{1,3})[.)]\s")
                        .context("failed to compile bare-number marker regex")?,
                },
            ],
            min_content_chars,
            dedupe,
        })
    }

    pub fn segment(&self, text: &str) -> Segmentation<QuestionPattern> {
        let min_content_chars = self.min_content_chars;
        segment(
            text,
            &self.patterns,
            normalize_question_number,
            |_, content| content.chars().count() > min_content_chars,
            self.dedupe,
        )
    }
}

pub fn to_records(segmentation: &Segmentation<QuestionPattern>) -> Vec<QuestionRecord> {
    segmentation
        .resolved
        .iter()
        .map(|candidate| QuestionRecord::new(candidate.label.clone(), candidate.captured.clone()))
        .collect()
}

/// "007" and "7" name the same question.
pub fn normalize_question_number(raw: &str) -> String {
    let trimmed = raw.trim().trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
