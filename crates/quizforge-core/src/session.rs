//! A single play-through of a quiz.
//!
//! The session walks the questions in order. An answer can be changed as
//! often as the player likes until they advance; advancing past the last
//! question completes the session, after which it accepts no more input.

use std::sync::Arc;

use crate::error::QuizError;
use crate::model::{Question, Quiz, QuizId, OPTION_COUNT};
use crate::store::QuizStore;

/// Where a session is in its play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Showing the question at this index.
    AwaitingAnswer(usize),
    Completed,
}

#[derive(Debug, Clone)]
pub struct Session {
    quiz: Arc<Quiz>,
    current: usize,
    answers: Vec<Option<usize>>,
    completed: bool,
}

impl Session {
    /// Begin playing `quiz` from its first question.
    pub fn start(quiz: Arc<Quiz>) -> Self {
        tracing::debug!("starting session for quiz {}", quiz.id());
        let answers = vec![None; quiz.len()];
        Self {
            quiz,
            current: 0,
            answers,
            completed: false,
        }
    }

    /// Look up `id` in `store` and begin playing it.
    pub fn start_by_id(store: &QuizStore, id: QuizId) -> Result<Self, QuizError> {
        store
            .find_by_id(id)
            .map(Self::start)
            .ok_or(QuizError::QuizNotFound(id))
    }

    pub fn quiz(&self) -> &Arc<Quiz> {
        &self.quiz
    }

    pub fn state(&self) -> SessionState {
        if self.completed {
            SessionState::Completed
        } else {
            SessionState::AwaitingAnswer(self.current)
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Index of the question being shown (the last one once completed).
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.quiz.questions()[self.current]
    }

    /// Whether the current question is the final one.
    pub fn is_last(&self) -> bool {
        self.current + 1 == self.quiz.len()
    }

    /// Recorded answers, one slot per question.
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn answer(&self, question: usize) -> Option<usize> {
        self.answers.get(question).copied().flatten()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Record `option` as the answer to the current question, replacing any
    /// earlier choice.
    pub fn select_answer(&mut self, option: usize) -> Result<(), QuizError> {
        if self.completed {
            return Err(QuizError::SessionCompleted);
        }
        if option >= OPTION_COUNT {
            return Err(QuizError::InvalidOption(option));
        }
        self.answers[self.current] = Some(option);
        tracing::debug!("question {} answered with option {}", self.current + 1, option + 1);
        Ok(())
    }

    /// Move past the current question.
    ///
    /// Requires the current question to be answered. A completed session
    /// rejects further advances with `SessionCompleted`.
    pub fn advance(&mut self) -> Result<SessionState, QuizError> {
        if self.completed {
            return Err(QuizError::SessionCompleted);
        }
        if self.answers[self.current].is_none() {
            return Err(QuizError::AnswerRequired {
                question: self.current,
            });
        }

        if self.is_last() {
            self.completed = true;
            tracing::info!("session for quiz {} completed", self.quiz.id());
        } else {
            self.current += 1;
            tracing::debug!("advanced to question {}", self.current + 1);
        }
        Ok(self.state())
    }
}
