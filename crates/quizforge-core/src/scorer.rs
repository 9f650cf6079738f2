//! Scoring a completed session.

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::Quiz;
use crate::session::Session;

/// Outcome of one question in a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionReview {
    pub question: String,
    pub is_correct: bool,
    pub chosen_option: String,
    pub correct_option: String,
}

/// Score for a finished session. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub correct_count: usize,
    pub total: usize,
    /// `correct_count / total` as a whole percentage, rounded half up.
    pub percentage: u32,
    pub review: Vec<QuestionReview>,
}

/// Score `session`, which must have been played on `quiz` to completion.
pub fn evaluate(quiz: &Quiz, session: &Session) -> Result<QuizResult, QuizError> {
    if session.quiz().id() != quiz.id() || session.answers().len() != quiz.len() {
        tracing::warn!(
            "session for quiz {} scored against quiz {}",
            session.quiz().id(),
            quiz.id()
        );
        return Err(QuizError::QuizMismatch);
    }
    if !session.is_completed() {
        tracing::warn!("scoring requested before session for quiz {} completed", quiz.id());
        return Err(QuizError::IncompleteSession {
            answered: session.answered_count(),
            total: quiz.len(),
        });
    }

    let mut review = Vec::with_capacity(quiz.len());
    for (i, question) in quiz.questions().iter().enumerate() {
        let chosen = session.answer(i).ok_or(QuizError::IncompleteSession {
            answered: session.answered_count(),
            total: quiz.len(),
        })?;
        let chosen_option = question
            .option(chosen)
            .ok_or(QuizError::InvalidOption(chosen))?;
        review.push(QuestionReview {
            question: question.text().to_string(),
            is_correct: question.is_correct(chosen),
            chosen_option: chosen_option.to_string(),
            correct_option: question.correct_option().to_string(),
        });
    }

    let total = review.len();
    let correct_count = review.iter().filter(|r| r.is_correct).count();
    let result = QuizResult {
        correct_count,
        total,
        percentage: percentage(correct_count, total),
        review,
    };
    tracing::debug!(
        "quiz {} scored {}/{} ({}%)",
        quiz.id(),
        result.correct_count,
        result.total,
        result.percentage
    );
    Ok(result)
}

/// Whole-number percentage of `part` in `total`, rounding halves up.
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * part + total) / (2 * total)) as u32
}
