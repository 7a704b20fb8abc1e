use serde::{Deserialize, Serialize};

pub const DEFAULT_SUBJECT: &str = "Unknown";
pub const DEFAULT_TOPIC: &str = "Unknown";
pub const DEFAULT_DIFFICULTY: i64 = 2;

/// One extracted exam question, as written to the review JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub number: String,
    pub content: String,
    pub subject: String,
    pub topic: String,
    pub difficulty: i64,
}

impl QuestionRecord {
    pub fn new(number: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            content: content.into(),
            subject: DEFAULT_SUBJECT.to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            difficulty: DEFAULT_DIFFICULTY,
        }
    }
}

/// Candidate answer choice. Correctness is always left to a human reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionRecord {
    pub text: String,
    pub is_correct: bool,
}

impl OptionRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersions {
    pub qextract: String,
    pub pdftotext: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceEntry {
    pub path: String,
    pub kind: String,
    pub sha256: String,
    pub text_char_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractSettings {
    pub subject_id: String,
    pub title_label: String,
    pub dedupe: String,
    pub paragraphs: String,
    pub min_question_chars: usize,
    pub min_option_chars: usize,
    pub max_pages: Option<usize>,
    pub symbol_table: String,
    pub symbol_entries: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PatternCount {
    pub pattern: String,
    pub matched: usize,
    pub kept: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractCounts {
    pub question_patterns: Vec<PatternCount>,
    pub question_candidates_kept: usize,
    pub questions_resolved: usize,
    pub duplicates_dropped: usize,
    pub questions_with_options: usize,
    pub options_total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractOutputs {
    pub text_path: String,
    pub questions_path: String,
    pub sql_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub tool_versions: ToolVersions,
    pub source: SourceEntry,
    pub settings: ExtractSettings,
    pub counts: ExtractCounts,
    pub outputs: ExtractOutputs,
    pub warnings: Vec<String>,
}
