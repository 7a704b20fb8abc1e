use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::{error, info};

const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_HEADER_WINDOW: usize = 1024;

/// Extracts every page of `pdf_path` and joins them, one trailing newline per
/// page. Failures are logged and collapse to an empty string; callers must
/// treat empty text as a terminal extraction failure.
pub fn extract_text(pdf_path: &Path, max_pages: Option<usize>) -> String {
    match extract_pages(pdf_path, max_pages) {
        Ok(pages) => {
            info!(path = %pdf_path.display(), pages = pages.len(), "extracted pdf text layer");
            join_pages(&pages)
        }
        Err(err) => {
            error!(path = %pdf_path.display(), error = %format!("{err:#}"), "error reading pdf");
            String::new()
        }
    }
}

pub fn extract_pages(pdf_path: &Path, max_pages: Option<usize>) -> Result<Vec<String>> {
    ensure_pdf_header(pdf_path)?;

    if !command_available("pdftotext") {
        bail!("pdftotext is not available on PATH (install poppler-utils)");
    }

    let mut command = Command::new("pdftotext");
    command.arg("-enc").arg("UTF-8").arg("-f").arg("1");
    if let Some(max_pages) = max_pages {
        command.arg("-l").arg(max_pages.to_string());
    }
    command.arg(pdf_path).arg("-");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", pdf_path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(split_pdftotext_pages(&String::from_utf8_lossy(&output.stdout)))
}

/// pdftotext separates pages with form feeds and ends the last page with one.
pub fn split_pdftotext_pages(raw: &str) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .split('\u{000C}')
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    pages
}

pub fn join_pages(pages: &[String]) -> String {
    let mut text = String::with_capacity(pages.iter().map(|page| page.len() + 1).sum());
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text
}

fn ensure_pdf_header(pdf_path: &Path) -> Result<()> {
    let file = File::open(pdf_path)
        .with_context(|| format!("failed to open {}", pdf_path.display()))?;

    let mut header = Vec::with_capacity(PDF_HEADER_WINDOW);
    file.take(PDF_HEADER_WINDOW as u64)
        .read_to_end(&mut header)
        .with_context(|| format!("failed to read {}", pdf_path.display()))?;

    if !header.windows(PDF_MAGIC.len()).any(|window| window == PDF_MAGIC) {
        bail!("{} does not look like a PDF document", pdf_path.display());
    }

    Ok(())
}

pub fn command_available(program: &str) -> bool {
    Command::new(program).arg("-v").output().is_ok()
}

pub fn command_version_optional(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
}
