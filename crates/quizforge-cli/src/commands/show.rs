//! The `quizforge show` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::render::question_label;
use quizforge_core::QuizError;

pub fn execute(config: Option<PathBuf>, store: Option<PathBuf>, id: String) -> Result<()> {
    let store = super::open_store(config, store)?;
    let id = super::parse_id(&id)?;
    let quiz = store.find_by_id(id).ok_or(QuizError::QuizNotFound(id))?;

    println!("{} (id {})", quiz.title(), quiz.id());
    if !quiz.description().is_empty() {
        println!("{}", quiz.description());
    }
    println!("Created {}", quiz.created_at().format("%Y-%m-%d %H:%M UTC"));

    for (i, question) in quiz.questions().iter().enumerate() {
        println!("\n{}: {}", question_label(i), question.text());
        for (n, option) in question.options().iter().enumerate() {
            let marker = if question.is_correct(n) { "*" } else { " " };
            println!("  {marker} {}. {option}", n + 1);
        }
    }

    Ok(())
}
