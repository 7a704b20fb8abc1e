use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::pdf_text::{command_version_optional, extract_text};
use super::pipeline::{ExtractConfig, run_pipeline};
use super::symbols::SymbolTable;
use crate::cli::ExtractArgs;
use crate::model::{
    ExtractOutputs, ExtractRunManifest, ExtractSettings, SourceEntry, ToolVersions,
};
use crate::util::{
    commit_staged, now_utc_string, render_json_pretty, sha256_file, utc_compact_string,
    write_json_pretty, write_staged,
};

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    info!(input = %args.input.display(), run_id = %run_id, "starting extraction");

    let config = ExtractConfig::from_args(&args);
    let symbols = SymbolTable::load_or_builtin(args.symbols.as_deref())?;

    let text = load_source_text(&args)?;
    if text.trim().is_empty() {
        bail!(
            "could not extract text from {}; check the file path and format",
            args.input.display()
        );
    }

    let output = run_pipeline(&text, &config, &symbols, Uuid::new_v4)?;
    info!(count = output.questions.len(), "found potential questions");
    for question in &output.prepared {
        debug!(
            id = %question.id,
            title = %question.title,
            options = question.options.len(),
            "prepared question"
        );
    }

    let text_path = args.out_dir.join(&args.text_file);
    let questions_path = args.out_dir.join(&args.questions_file);
    let sql_path = args.out_dir.join(&args.sql_file);

    let questions_json = render_json_pretty(&output.questions)
        .with_context(|| format!("failed to render {}", questions_path.display()))?;

    write_outputs(&[
        (text_path.clone(), text.as_bytes().to_vec()),
        (questions_path.clone(), questions_json),
        (sql_path.clone(), output.sql.into_bytes()),
    ])?;

    info!(
        text = %text_path.display(),
        questions = %questions_path.display(),
        sql = %sql_path.display(),
        "wrote review artifacts"
    );

    if let Some(manifest_path) = &args.manifest_path {
        let mut warnings = Vec::new();
        if output.counts.questions_resolved == 0 {
            warnings.push(
                "no question markers produced content above the length threshold".to_string(),
            );
        }
        if output.counts.duplicates_dropped > 0 {
            warnings.push(format!(
                "{} overlapping or repeated question candidates were dropped by '{}' resolution",
                output.counts.duplicates_dropped,
                args.dedupe.as_str()
            ));
        }

        let manifest = ExtractRunManifest {
            manifest_version: 1,
            run_id,
            status: "completed".to_string(),
            started_at,
            updated_at: now_utc_string(),
            command: render_extract_command(&args),
            tool_versions: ToolVersions {
                qextract: env!("CARGO_PKG_VERSION").to_string(),
                pdftotext: if args.from_text {
                    None
                } else {
                    command_version_optional("pdftotext", &["-v"])
                },
            },
            source: SourceEntry {
                path: args.input.display().to_string(),
                kind: (if args.from_text { "text" } else { "pdf" }).to_string(),
                sha256: sha256_file(&args.input)?,
                text_char_count: text.chars().count(),
            },
            settings: ExtractSettings {
                subject_id: config.subject_id.clone(),
                title_label: config.title_label.clone(),
                dedupe: config.dedupe.as_str().to_string(),
                paragraphs: config.paragraphs.as_str().to_string(),
                min_question_chars: config.min_question_chars,
                min_option_chars: config.min_option_chars,
                max_pages: args.max_pages,
                symbol_table: symbols.source().to_string(),
                symbol_entries: symbols.len(),
            },
            counts: output.counts.clone(),
            outputs: ExtractOutputs {
                text_path: text_path.display().to_string(),
                questions_path: questions_path.display().to_string(),
                sql_path: sql_path.display().to_string(),
            },
            warnings,
        };

        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote extraction run manifest");
    }

    print_summary(&text_path, &questions_path, &sql_path)
        .context("failed to write summary to stdout")?;

    Ok(())
}

fn load_source_text(args: &ExtractArgs) -> Result<String> {
    if args.from_text {
        info!(path = %args.input.display(), "reading pre-extracted text");
        return fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()));
    }

    info!(path = %args.input.display(), "extracting text from pdf");
    Ok(extract_text(&args.input, args.max_pages))
}

/// Stages every artifact before moving any into place. A failed staging write
/// leaves every existing file untouched. Renames run in order, so if one fails
/// the artifacts before it are already new, the rest keep their old contents,
/// and no `.tmp` files remain.
fn write_outputs(outputs: &[(PathBuf, Vec<u8>)]) -> Result<()> {
    let mut staged = Vec::with_capacity(outputs.len());

    for (path, data) in outputs {
        match write_staged(path, data) {
            Ok(staged_path) => staged.push((staged_path, path.clone())),
            Err(err) => {
                discard_staged(&staged);
                return Err(err);
            }
        }
    }

    for (index, (staged_path, path)) in staged.iter().enumerate() {
        if let Err(err) = commit_staged(staged_path, path) {
            discard_staged(&staged[index..]);
            return Err(err);
        }
    }

    Ok(())
}

fn discard_staged(staged: &[(PathBuf, PathBuf)]) {
    for (staged_path, _) in staged {
        if let Err(err) = fs::remove_file(staged_path) {
            warn!(path = %staged_path.display(), error = %err, "failed to remove staged file");
        }
    }
}

fn print_summary(text_path: &Path, questions_path: &Path, sql_path: &Path) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(out, "Files created:")?;
    writeln!(out, "- {}: Raw extracted text", text_path.display())?;
    writeln!(out, "- {}: Structured question data", questions_path.display())?;
    writeln!(out, "- {}: SQL insert statements", sql_path.display())?;
    writeln!(out)?;
    writeln!(
        out,
        "Please review and edit these files before inserting into the database."
    )?;
    Ok(())
}

pub(super) fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = vec![
        "qextract".to_string(),
        "extract".to_string(),
        "--input".to_string(),
        args.input.display().to_string(),
        "--out-dir".to_string(),
        args.out_dir.display().to_string(),
        "--subject-id".to_string(),
        args.subject_id.clone(),
        "--title-label".to_string(),
        format!("{:?}", args.title_label),
        "--dedupe".to_string(),
        args.dedupe.as_str().to_string(),
        "--paragraphs".to_string(),
        args.paragraphs.as_str().to_string(),
        "--min-question-chars".to_string(),
        args.min_question_chars.to_string(),
        "--min-option-chars".to_string(),
        args.min_option_chars.to_string(),
        "--text-file".to_string(),
        args.text_file.display().to_string(),
        "--questions-file".to_string(),
        args.questions_file.display().to_string(),
        "--sql-file".to_string(),
        args.sql_file.display().to_string(),
    ];

    if args.from_text {
        command.push("--from-text".to_string());
    }
    if let Some(path) = &args.symbols {
        command.push("--symbols".to_string());
        command.push(path.display().to_string());
    }
    if let Some(max_pages) = args.max_pages {
        command.push("--max-pages".to_string());
        command.push(max_pages.to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}
