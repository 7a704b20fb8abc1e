use anyhow::Result;
use tracing::{debug, info};
use uuid::Uuid;

use super::clean::clean_text;
use super::options::OptionSegmenter;
use super::questions::{QuestionSegmenter, to_records};
use super::sql::{PreparedOption, PreparedQuestion, SqlGenerator, derive_title};
use super::symbols::SymbolTable;
use crate::cli::{DedupeMode, ExtractArgs, ParagraphMode};
use crate::model::{ExtractCounts, QuestionRecord};

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub subject_id: String,
    pub title_label: String,
    pub dedupe: DedupeMode,
    pub paragraphs: ParagraphMode,
    pub min_question_chars: usize,
    pub min_option_chars: usize,
}

impl ExtractConfig {
    pub fn from_args(args: &ExtractArgs) -> Self {
        Self {
            subject_id: args.subject_id.clone(),
            title_label: args.title_label.clone(),
            dedupe: args.dedupe,
            paragraphs: args.paragraphs,
            min_question_chars: args.min_question_chars,
            min_option_chars: args.min_option_chars,
        }
    }
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub questions: Vec<QuestionRecord>,
    pub prepared: Vec<PreparedQuestion>,
    pub sql: String,
    pub counts: ExtractCounts,
}

/// Runs every in-memory step after text extraction. `next_id` supplies the
/// identifiers embedded in the generated SQL.
pub fn run_pipeline<F>(
    text: &str,
    config: &ExtractConfig,
    symbols: &SymbolTable,
    mut next_id: F,
) -> Result<PipelineOutput>
where
    F: FnMut() -> Uuid,
{
    let cleaned = clean_text(text, config.paragraphs);
    debug!(chars = cleaned.chars().count(), "cleaned extracted text");

    let question_segmenter = QuestionSegmenter::new(config.min_question_chars, config.dedupe)?;
    let option_segmenter = OptionSegmenter::new(config.min_option_chars, config.dedupe)?;

    let segmentation = question_segmenter.segment(&cleaned);
    for count in &segmentation.pattern_counts {
        debug!(
            pattern = %count.pattern,
            matched = count.matched,
            kept = count.kept,
            "question pattern candidates"
        );
    }
    let questions = to_records(&segmentation);

    let prepared = questions
        .iter()
        .map(|record| {
            let body = symbols.apply(&clean_text(&record.content, config.paragraphs));
            let id = next_id();
            let options = option_segmenter
                .extract(&body)
                .into_iter()
                .map(|option| PreparedOption {
                    id: next_id(),
                    option,
                })
                .collect::<Vec<_>>();

            PreparedQuestion {
                id,
                record: record.clone(),
                title: derive_title(&config.title_label, &record.number),
                body,
                options,
            }
        })
        .collect::<Vec<_>>();

    let sql = SqlGenerator::new(config.subject_id.clone()).render(&prepared);

    let counts = ExtractCounts {
        question_patterns: segmentation.pattern_counts.clone(),
        question_candidates_kept: segmentation.candidates_kept,
        questions_resolved: questions.len(),
        duplicates_dropped: segmentation.duplicates_dropped(),
        questions_with_options: prepared
            .iter()
            .filter(|question| !question.options.is_empty())
            .count(),
        options_total: prepared.iter().map(|question| question.options.len()).sum(),
    };

    info!(
        candidates = counts.question_candidates_kept,
        questions = counts.questions_resolved,
        duplicates_dropped = counts.duplicates_dropped,
        options = counts.options_total,
        dedupe = config.dedupe.as_str(),
        "segmented questions"
    );

    Ok(PipelineOutput {
        questions,
        prepared,
        sql,
        counts,
    })
}
