use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "qextract",
    version,
    about = "Extract exam questions from a PDF into review JSON and SQL"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Symbols(SymbolsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long, default_value = "question_answers.pdf")]
    pub input: PathBuf,

    /// Treat --input as already extracted UTF-8 text instead of a PDF.
    #[arg(long, default_value_t = false)]
    pub from_text: bool,

    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    #[arg(long)]
    pub subject_id: String,

    #[arg(long, default_value = "JEE Mains 2025")]
    pub title_label: String,

    /// JSON symbol table; the built-in table is used when omitted.
    #[arg(long)]
    pub symbols: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = DedupeMode::Priority)]
    pub dedupe: DedupeMode,

    #[arg(long, value_enum, default_value_t = ParagraphMode::Preserve)]
    pub paragraphs: ParagraphMode,

    #[arg(long, default_value_t = 50)]
    pub min_question_chars: usize,

    #[arg(long, default_value_t = 5)]
    pub min_option_chars: usize,

    #[arg(long)]
    pub max_pages: Option<usize>,

    #[arg(long, default_value = "extracted_text.txt")]
    pub text_file: PathBuf,

    #[arg(long, default_value = "extracted_questions.json")]
    pub questions_file: PathBuf,

    #[arg(long, default_value = "jee_mains_2025_questions.sql")]
    pub sql_file: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum DedupeMode {
    Priority,
    Longest,
    KeepAll,
}

impl DedupeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Longest => "longest",
            Self::KeepAll => "keep-all",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ParagraphMode {
    Preserve,
    Flatten,
}

impl ParagraphMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preserve => "preserve",
            Self::Flatten => "flatten",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SymbolsArgs {
    #[arg(long, default_value = "symbols.json")]
    pub output: PathBuf,
}
