use crate::cli::ParagraphMode;

/// Normalizes whitespace. In `Preserve` mode single line breaks are treated as
/// wraps and folded into spaces while runs of blank lines become exactly one
/// blank line; `Flatten` folds everything onto one line.
pub fn clean_text(text: &str, mode: ParagraphMode) -> String {
    match mode {
        ParagraphMode::Flatten => condense_whitespace(text),
        ParagraphMode::Preserve => split_paragraphs(text)
            .into_iter()
            .map(|paragraph| condense_whitespace(&paragraph))
            .collect::<Vec<String>>()
            .join("\n\n"),
    }
}

pub fn condense_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn split_paragraphs(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut paragraphs = Vec::new();
    let mut current = Vec::<&str>::new();

    for line in normalized.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        current.push(line);
    }

    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs
}
