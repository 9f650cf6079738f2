//! The `quizforge init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizforge.toml").exists() {
        println!("quizforge.toml already exists, skipping.");
    } else {
        std::fs::write("quizforge.toml", SAMPLE_CONFIG)?;
        println!("Created quizforge.toml");
    }

    std::fs::create_dir_all("drafts")?;
    let example_path = std::path::Path::new("drafts/example.toml");
    if example_path.exists() {
        println!("drafts/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_DRAFT)?;
        println!("Created drafts/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizforge validate --draft drafts/example.toml");
    println!("  2. Run: quizforge create --draft drafts/example.toml");
    println!("  3. Run: quizforge list, then quizforge take --id <ID>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizforge configuration

# Where committed quizzes are kept. ${VAR} references are expanded.
store_path = "./quizforge-data/quizzes.json"
pretty = true
"#;

const EXAMPLE_DRAFT: &str = r#"title = "General Knowledge"
description = "A short warm-up quiz"

[[questions]]
text = "2+2?"
options = ["3", "4", "5", "6"]
correct = 1

[[questions]]
text = "Capital of France?"
options = ["Berlin", "Paris", "Rome", "Madrid"]
correct = 1
"#;
