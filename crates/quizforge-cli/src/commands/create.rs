//! The `quizforge create` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizforge_core::draft_file::parse_draft;
use quizforge_core::QuizBuilder;

pub fn execute(config: Option<PathBuf>, store: Option<PathBuf>, draft_path: PathBuf) -> Result<()> {
    let draft = parse_draft(&draft_path)?;
    let mut store = super::open_store(config, store)?;

    let mut builder = QuizBuilder::new();
    builder.load(draft);
    let quiz = builder
        .commit(&mut store)
        .with_context(|| format!("could not create quiz from {}", draft_path.display()))?;

    tracing::info!("quiz {} written", quiz.id());
    println!(
        "Created quiz {} '{}' ({} questions)",
        quiz.id(),
        quiz.title(),
        quiz.len()
    );
    Ok(())
}
