//! Engine error types.
//!
//! `QuizError` is the single error returned by engine operations. Its
//! variants follow who is expected to fix the problem: the person filling in
//! a form (`Validation`), the person playing (`InvalidOption`,
//! `AnswerRequired`), the integrating code (`IncompleteSession`,
//! `SessionCompleted`, `QuizMismatch`), or the environment (`Persistence`).

use std::path::PathBuf;

use thiserror::Error;

use crate::model::QuizId;

/// A defect in a draft that blocks it from being committed.
///
/// Question and option positions are zero-based; `Display` shows them
/// one-based the way they are labelled to the author.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("quiz title is missing")]
    TitleMissing,

    #[error("question {} has no text", .question + 1)]
    QuestionIncomplete { question: usize },

    #[error("question {} is missing option {}", .question + 1, .option + 1)]
    OptionIncomplete { question: usize, option: usize },

    #[error("question {} has no correct answer selected", .question + 1)]
    AnswerUnselected { question: usize },

    #[error("a quiz needs at least one question")]
    MinimumOneQuestion,

    #[error("no question at position {} (draft has {len})", .index + 1)]
    NoSuchQuestion { index: usize, len: usize },
}

impl ValidationError {
    /// Stable category name for this violation.
    pub fn category(&self) -> &'static str {
        match self {
            ValidationError::TitleMissing => "title-missing",
            ValidationError::QuestionIncomplete { .. } => "question-incomplete",
            ValidationError::OptionIncomplete { .. } => "option-incomplete",
            ValidationError::AnswerUnselected { .. } => "answer-unselected",
            ValidationError::MinimumOneQuestion => "minimum-one-question",
            ValidationError::NoSuchQuestion { .. } => "no-such-question",
        }
    }
}

/// Failures of the medium backing the quiz store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", .location.display())]
    Read {
        location: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .location.display())]
    Write {
        location: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize quizzes: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Another writer replaced the blob since this store last saw it.
    #[error("quiz store was modified by another writer; reload and retry")]
    Conflict,
}

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("option {0} is out of range (expected 0..4)")]
    InvalidOption(usize),

    #[error("select an answer for question {} before continuing", .question + 1)]
    AnswerRequired { question: usize },

    #[error("session is already completed")]
    SessionCompleted,

    #[error("session is not completed ({answered} of {total} questions answered)")]
    IncompleteSession { answered: usize, total: usize },

    #[error("session was started for a different quiz")]
    QuizMismatch,

    #[error("quiz not found: {0}")]
    QuizNotFound(QuizId),

    /// The store already holds the largest representable id.
    #[error("no quiz ids left in this store")]
    IdsExhausted,

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl QuizError {
    /// Returns `true` if the person at the keyboard can fix this by changing
    /// their input and trying again.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            QuizError::Validation(_) | QuizError::InvalidOption(_) | QuizError::AnswerRequired { .. }
        )
    }
}
