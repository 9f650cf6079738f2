//! The `quizforge validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::draft_file::parse_draft;
use quizforge_core::render::draft_labels;

pub fn execute(draft_path: PathBuf) -> Result<()> {
    let draft = parse_draft(&draft_path)?;
    let title = if draft.title.trim().is_empty() {
        "(untitled)"
    } else {
        draft.title.trim()
    };
    println!("Draft: {title} ({} questions)", draft.questions().len());

    let violations = draft.validate();
    if violations.is_empty() {
        for label in draft_labels(&draft) {
            println!("  {label}: ok");
        }
        println!("Draft is valid.");
    } else {
        for v in &violations {
            println!("  [{}] {v}", v.category());
        }
        println!("\n{} problem(s) found.", violations.len());
    }

    Ok(())
}
