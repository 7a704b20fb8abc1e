use uuid::Uuid;

use crate::model::{OptionRecord, QuestionRecord};

#[derive(Debug, Clone)]
pub struct PreparedOption {
    pub id: Uuid,
    pub option: OptionRecord,
}

/// A question ready to render: ids are assigned up front so option rows can
/// reference their question directly.
#[derive(Debug, Clone)]
pub struct PreparedQuestion {
    pub id: Uuid,
    pub record: QuestionRecord,
    pub title: String,
    pub body: String,
    pub options: Vec<PreparedOption>,
}

pub fn derive_title(label: &str, number: &str) -> String {
    format!("{label} - Question {number}")
}

#[derive(Debug, Clone)]
pub struct SqlGenerator {
    subject_id: String,
}

impl SqlGenerator {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
        }
    }

    pub fn render(&self, questions: &[PreparedQuestion]) -> String {
        let mut statements = vec![
            "-- Generated by qextract. Review before executing.".to_string(),
            "-- Every option is inserted with is_correct = false; mark correct answers by hand."
                .to_string(),
            "SET standard_conforming_strings = on;".to_string(),
        ];

        for question in questions {
            statements.push(String::new());
            statements.push(format!("-- Question {}", question.record.number));
            statements.push(self.render_question_insert(question));

            if let Some(block) = render_options_block(question) {
                statements.push(String::new());
                statements.push(format!("-- Options for Question {}", question.record.number));
                statements.push(block);
            }
        }

        let mut sql = statements.join("\n");
        sql.push('\n');
        sql
    }

    pub fn render_question_insert(&self, question: &PreparedQuestion) -> String {
        format!(
            "INSERT INTO questions (id, subject_id, title, body, topic, difficulty) VALUES (\n    {},\n    {},\n    {},\n    {},\n    {},\n    {}\n);",
            quote_literal(&question.id.to_string()),
            quote_literal(&self.subject_id),
            quote_literal(&question.title),
            quote_literal(&question.body),
            quote_literal(&question.record.topic),
            question.record.difficulty
        )
    }
}

pub fn render_option_insert(option: &PreparedOption, question_id: Uuid) -> String {
    format!(
        "INSERT INTO options (id, question_id, text, is_correct) VALUES (\n        {}, {}, {}, {}\n    );",
        quote_literal(&option.id.to_string()),
        quote_literal(&question_id.to_string()),
        quote_literal(&option.option.text),
        if option.option.is_correct { "true" } else { "false" }
    )
}

fn render_options_block(question: &PreparedQuestion) -> Option<String> {
    if question.options.is_empty() {
        return None;
    }

    let body = question
        .options
        .iter()
        .map(|option| format!("    {}", render_option_insert(option, question.id)))
        .collect::<Vec<String>>()
        .join("\n");
    let tag = dollar_quote_tag(&body);

    Some(format!("DO {tag}\nBEGIN\n{body}\nEND {tag};"))
}

/// Standard-conforming string literal. PostgreSQL text cannot hold NUL, so it
/// is dropped; everything else survives unchanged.
pub fn quote_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for character in value.chars() {
        match character {
            '\'' => quoted.push_str("''"),
            '\u{0000}' => {}
            other => quoted.push(other),
        }
    }
    quoted.push('\'');
    quoted
}

pub fn dollar_quote_tag(body: &str) -> String {
    if !body.contains("$$") {
        return "$$".to_string();
    }

    let mut suffix = 0usize;
    loop {
        let tag = if suffix == 0 {
            "$opt$".to_string()
        } else {
            format!("$opt{suffix}$")
        };
        if !body.contains(&tag) {
            return tag;
        }
        suffix += 1;
    }
}
