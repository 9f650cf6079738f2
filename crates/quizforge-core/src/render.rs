//! View models for presentation layers.
//!
//! Each function maps engine state to plain data with the wording a screen
//! should show. Nothing here prints or mutates.

use std::sync::Arc;

use serde::Serialize;

use crate::builder::Draft;
use crate::model::{Quiz, QuizId};
use crate::scorer::{percentage, QuizResult};
use crate::session::Session;

pub const EMPTY_LIST_HEADING: &str = "No Quizzes Available";
pub const EMPTY_LIST_HINT: &str = "Create your first quiz to get started!";
pub const NO_DESCRIPTION: &str = "No description available";
pub const NEXT_LABEL: &str = "Next Question";
pub const FINISH_LABEL: &str = "Finish Quiz";

/// Ordinal label shown for the question at `index`.
pub fn question_label(index: usize) -> String {
    format!("Question {}", index + 1)
}

/// One entry in the quiz list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizCard {
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub meta: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ListView {
    Empty { heading: String, hint: String },
    Cards { cards: Vec<QuizCard> },
}

pub fn list_view(quizzes: &[Arc<Quiz>]) -> ListView {
    if quizzes.is_empty() {
        return ListView::Empty {
            heading: EMPTY_LIST_HEADING.into(),
            hint: EMPTY_LIST_HINT.into(),
        };
    }
    let cards = quizzes
        .iter()
        .map(|quiz| QuizCard {
            id: quiz.id(),
            title: quiz.title().to_string(),
            description: if quiz.description().is_empty() {
                NO_DESCRIPTION.to_string()
            } else {
                quiz.description().to_string()
            },
            meta: format!(
                "{} questions • Created on {}",
                quiz.len(),
                quiz.created_at().format("%Y-%m-%d")
            ),
        })
        .collect();
    ListView::Cards { cards }
}

/// Labels for the draft's question blocks, renumbered from 1.
pub fn draft_labels(draft: &Draft) -> Vec<String> {
    (0..draft.questions().len()).map(question_label).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    /// 1-based number shown next to the option.
    pub number: usize,
    pub text: String,
    pub selected: bool,
}

/// The screen for the question a session is currently on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionScreen {
    pub heading: String,
    pub text: String,
    pub options: Vec<OptionView>,
    pub progress_percent: u32,
    pub next_label: &'static str,
}

pub fn question_screen(session: &Session) -> QuestionScreen {
    let index = session.current_index();
    let total = session.quiz().len();
    let question = session.current_question();
    let selected = session.answer(index);

    QuestionScreen {
        heading: format!("Question {} of {}", index + 1, total),
        text: question.text().to_string(),
        options: question
            .options()
            .iter()
            .enumerate()
            .map(|(i, text)| OptionView {
                number: i + 1,
                text: text.clone(),
                selected: selected == Some(i),
            })
            .collect(),
        progress_percent: percentage(index + 1, total),
        next_label: if session.is_last() {
            FINISH_LABEL
        } else {
            NEXT_LABEL
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub question: String,
    pub is_correct: bool,
    pub status: &'static str,
    pub your_answer: String,
    /// Only present when the answer was wrong.
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView {
    pub score: String,
    pub message: String,
    pub review: Vec<ReviewItem>,
}

pub fn results_view(result: &QuizResult) -> ResultsView {
    ResultsView {
        score: format!("{}%", result.percentage),
        message: format!(
            "You got {} out of {} questions correct!",
            result.correct_count, result.total
        ),
        review: result
            .review
            .iter()
            .map(|r| ReviewItem {
                question: r.question.clone(),
                is_correct: r.is_correct,
                status: if r.is_correct {
                    "✓ Correct"
                } else {
                    "✗ Incorrect"
                },
                your_answer: r.chosen_option.clone(),
                correct_answer: (!r.is_correct).then(|| r.correct_option.clone()),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::scorer::evaluate;

    fn quiz(description: &str, questions: usize) -> Arc<Quiz> {
        let mut draft = Draft::new();
        draft.title = "Geography".into();
        draft.description = description.into();
        for i in 0..questions {
            let idx = if i == 0 { 0 } else { draft.add_question() };
            let q = draft.question_mut(idx).unwrap();
            q.text = format!("Q{i}");
            q.options = ["w".into(), "x".into(), "y".into(), "z".into()];
            q.correct = Some(1);
        }
        let created = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        Arc::new(draft.to_quiz(QuizId(3), created).unwrap())
    }

    #[test]
    fn empty_store_renders_empty_state() {
        assert_eq!(
            list_view(&[]),
            ListView::Empty {
                heading: EMPTY_LIST_HEADING.into(),
                hint: EMPTY_LIST_HINT.into(),
            }
        );
    }

    #[test]
    fn cards_fall_back_to_placeholder_description() {
        let ListView::Cards { cards } = list_view(&[quiz("", 2)]) else {
            panic!("expected cards");
        };
        assert_eq!(cards[0].description, NO_DESCRIPTION);
        assert_eq!(cards[0].meta, "2 questions • Created on 2024-05-06");
    }

    #[test]
    fn draft_labels_renumber_after_removal() {
        let mut draft = Draft::new();
        draft.add_question();
        draft.add_question();
        draft.remove_question(0).unwrap();
        assert_eq!(draft_labels(&draft), vec!["Question 1", "Question 2"]);
    }

    #[test]
    fn question_screen_tracks_selection_and_label() {
        let mut session = Session::start(quiz("d", 2));
        let screen = question_screen(&session);
        assert_eq!(screen.heading, "Question 1 of 2");
        assert_eq!(screen.progress_percent, 50);
        assert_eq!(screen.next_label, NEXT_LABEL);
        assert!(screen.options.iter().all(|o| !o.selected));

        session.select_answer(2).unwrap();
        session.advance().unwrap();
        session.select_answer(3).unwrap();
        let screen = question_screen(&session);
        assert_eq!(screen.heading, "Question 2 of 2");
        assert_eq!(screen.progress_percent, 100);
        assert_eq!(screen.next_label, FINISH_LABEL);
        assert!(screen.options[3].selected);
        assert_eq!(screen.options[3].number, 4);
    }

    #[test]
    fn results_view_shows_correct_answer_only_when_wrong() {
        let quiz = quiz("d", 2);
        let mut session = Session::start(Arc::clone(&quiz));
        session.select_answer(1).unwrap();
        session.advance().unwrap();
        session.select_answer(0).unwrap();
        session.advance().unwrap();

        let view = results_view(&evaluate(&quiz, &session).unwrap());
        assert_eq!(view.score, "50%");
        assert_eq!(view.message, "You got 1 out of 2 questions correct!");
        assert_eq!(view.review[0].status, "✓ Correct");
        assert_eq!(view.review[0].correct_answer, None);
        assert_eq!(view.review[1].status, "✗ Incorrect");
        assert_eq!(view.review[1].your_answer, "w");
        assert_eq!(view.review[1].correct_answer.as_deref(), Some("x"));
    }
}
