//! The `quizforge take` command.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizforge_core::render::{question_screen, results_view};
use quizforge_core::{evaluate, QuizError, Session, OPTION_COUNT};

/// Where answers come from.
enum AnswerSource {
    /// Pre-supplied option numbers. Any mistake aborts.
    Fixed(std::vec::IntoIter<String>),
    /// Lines typed by the player. Mistakes are reported and re-prompted.
    Stdin(std::io::StdinLock<'static>),
}

impl AnswerSource {
    fn next(&mut self) -> Result<Option<String>> {
        match self {
            AnswerSource::Fixed(iter) => Ok(iter.next()),
            AnswerSource::Stdin(stdin) => {
                let mut line = String::new();
                if stdin.read_line(&mut line)? == 0 {
                    return Ok(None);
                }
                Ok(Some(line.trim().to_string()))
            }
        }
    }

    fn is_interactive(&self) -> bool {
        matches!(self, AnswerSource::Stdin(_))
    }

    /// Pre-supplied answers that were never consumed.
    fn unused(&self) -> usize {
        match self {
            AnswerSource::Fixed(iter) => iter.len(),
            AnswerSource::Stdin(_) => 0,
        }
    }
}

pub fn execute(
    config: Option<PathBuf>,
    store: Option<PathBuf>,
    id: String,
    answers: Option<String>,
) -> Result<()> {
    let store = super::open_store(config, store)?;
    let id = super::parse_id(&id)?;
    let mut session = Session::start_by_id(&store, id)?;

    let mut source = match answers {
        Some(list) => AnswerSource::Fixed(
            list.split(',')
                .map(|s| s.trim().to_string())
                .collect::<Vec<_>>()
                .into_iter(),
        ),
        None => AnswerSource::Stdin(std::io::stdin().lock()),
    };

    println!("{}", session.quiz().title());

    while !session.is_completed() {
        let screen = question_screen(&session);
        println!("\n{} [{}%]", screen.heading, screen.progress_percent);
        println!("{}", screen.text);
        for option in &screen.options {
            let mark = if option.selected { "x" } else { " " };
            println!("  [{mark}] {}. {}", option.number, option.text);
        }
        if source.is_interactive() {
            println!("Option number, then Enter ({}):", screen.next_label);
        }

        let Some(input) = source.next()? else {
            anyhow::bail!("input ended before the quiz was finished");
        };

        let outcome = match parse_choice(&input) {
            Ok(choice) => apply(&mut session, choice).map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            let correctable = e
                .downcast_ref::<QuizError>()
                .map_or(true, QuizError::is_user_correctable);
            if correctable && source.is_interactive() {
                println!("  ! {e}");
            } else {
                return Err(e);
            }
        }
    }

    let extra = source.unused();
    if extra > 0 {
        anyhow::bail!(
            "{extra} more answer(s) supplied than the quiz has questions ({})",
            session.quiz().len()
        );
    }

    let result = evaluate(session.quiz(), &session)?;
    let view = results_view(&result);

    println!("\nScore: {}", view.score);
    println!("{}", view.message);

    let mut table = Table::new();
    table.set_header(vec!["Question", "Result", "Your answer", "Correct answer"]);
    for item in &view.review {
        table.add_row(vec![
            Cell::new(&item.question),
            Cell::new(item.status),
            Cell::new(&item.your_answer),
            Cell::new(item.correct_answer.as_deref().unwrap_or("")),
        ]);
    }
    println!("{table}");

    Ok(())
}

/// Parse one line of input: an option number from 1 to 4, or nothing.
fn parse_choice(input: &str) -> Result<Option<usize>> {
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=OPTION_COUNT).contains(&n) => Ok(Some(n - 1)),
        _ => anyhow::bail!("'{input}' is not an option; enter a number from 1 to {OPTION_COUNT}"),
    }
}

/// Select `choice` if there is one, then try to move on.
fn apply(session: &mut Session, choice: Option<usize>) -> Result<(), QuizError> {
    if let Some(option) = choice {
        session.select_answer(option)?;
    }
    session.advance().map(|_| ())
}
