//! TOML draft documents.
//!
//! Lets a quiz be authored in a text file instead of a form:
//!
//! ```toml
//! title = "Arithmetic"
//! description = "Warm-up questions"
//!
//! [[questions]]
//! text = "2+2?"
//! options = ["3", "4", "5", "6"]
//! correct = 1
//! ```
//!
//! Parsing only checks the document's shape. Missing text, blank options,
//! and an absent `correct` come through as an incomplete `Draft` so that
//! `Draft::validate` can report them like any other authoring mistake.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::builder::Draft;
use crate::model::OPTION_COUNT;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlDraft {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlQuestion {
    #[serde(default)]
    text: String,
    #[serde(default)]
    options: Vec<String>,
    /// Zero-based index into `options`.
    #[serde(default)]
    correct: Option<usize>,
}

/// Parse a draft document from a file.
pub fn parse_draft(path: &Path) -> Result<Draft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read draft file: {}", path.display()))?;

    parse_draft_str(&content, path)
}

/// Parse a draft document held in memory.
pub fn parse_draft_str(content: &str, source_path: &Path) -> Result<Draft> {
    let parsed: TomlDraft = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut draft = Draft::new();
    draft.title = parsed.title;
    draft.description = parsed.description;

    for (position, q) in parsed.questions.into_iter().enumerate() {
        anyhow::ensure!(
            q.options.len() <= OPTION_COUNT,
            "question {} has {} options, at most {OPTION_COUNT} allowed",
            position + 1,
            q.options.len()
        );

        let index = if position == 0 {
            0
        } else {
            draft.add_question()
        };
        let question = draft.question_mut(index)?;
        question.text = q.text;
        for (slot, option) in q.options.into_iter().enumerate() {
            question.set_option(slot, option)?;
        }
        if let Some(correct) = q.correct {
            question
                .select_correct(correct)
                .with_context(|| format!("question {}: invalid `correct`", position + 1))?;
        }
    }

    Ok(draft)
}
