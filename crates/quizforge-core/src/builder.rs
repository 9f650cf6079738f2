//! Authoring: an editable draft that becomes a `Quiz` on commit.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{QuizError, ValidationError};
use crate::model::{Question, Quiz, QuizId, OPTION_COUNT};
use crate::store::QuizStore;

/// A question being written. Every field may still be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftQuestion {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    /// Index of the correct option, once the author has picked one.
    pub correct: Option<usize>,
}

impl DraftQuestion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text of option `index`.
    pub fn set_option(&mut self, index: usize, text: impl Into<String>) -> Result<(), QuizError> {
        let slot = self
            .options
            .get_mut(index)
            .ok_or(QuizError::InvalidOption(index))?;
        *slot = text.into();
        Ok(())
    }

    /// Mark option `index` as the correct answer.
    pub fn select_correct(&mut self, index: usize) -> Result<(), QuizError> {
        if index >= OPTION_COUNT {
            return Err(QuizError::InvalidOption(index));
        }
        self.correct = Some(index);
        Ok(())
    }

    fn check(&self, position: usize, violations: &mut Vec<ValidationError>) {
        if self.text.trim().is_empty() {
            violations.push(ValidationError::QuestionIncomplete { question: position });
        }
        for (option, text) in self.options.iter().enumerate() {
            if text.trim().is_empty() {
                violations.push(ValidationError::OptionIncomplete {
                    question: position,
                    option,
                });
            }
        }
        if self.correct.is_none() {
            violations.push(ValidationError::AnswerUnselected { question: position });
        }
    }

    fn freeze(&self, position: usize) -> Result<Question, ValidationError> {
        let correct = self
            .correct
            .ok_or(ValidationError::AnswerUnselected { question: position })?;
        Question::new(position, self.text.as_str(), self.options.clone(), correct)
    }
}

/// In-progress quiz. Always holds at least one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
    questions: Vec<DraftQuestion>,
}

impl Default for Draft {
    fn default() -> Self {
        Self::new()
    }
}

impl Draft {
    /// A blank draft with a single empty question.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            questions: vec![DraftQuestion::new()],
        }
    }

    pub fn questions(&self) -> &[DraftQuestion] {
        &self.questions
    }

    pub fn question_mut(&mut self, index: usize) -> Result<&mut DraftQuestion, ValidationError> {
        let len = self.questions.len();
        self.questions
            .get_mut(index)
            .ok_or(ValidationError::NoSuchQuestion { index, len })
    }

    /// Append an empty question and return its index.
    pub fn add_question(&mut self) -> usize {
        self.questions.push(DraftQuestion::new());
        tracing::debug!("draft now has {} questions", self.questions.len());
        self.questions.len() - 1
    }

    /// Remove the question at `index`. The last remaining question cannot be
    /// removed.
    pub fn remove_question(&mut self, index: usize) -> Result<DraftQuestion, ValidationError> {
        let len = self.questions.len();
        if len <= 1 {
            return Err(ValidationError::MinimumOneQuestion);
        }
        if index >= len {
            return Err(ValidationError::NoSuchQuestion { index, len });
        }
        let removed = self.questions.remove(index);
        tracing::debug!("removed draft question {}, {} left", index + 1, len - 1);
        Ok(removed)
    }

    /// Every violation that blocks a commit, in form order.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut violations = Vec::new();
        if self.title.trim().is_empty() {
            violations.push(ValidationError::TitleMissing);
        }
        for (position, question) in self.questions.iter().enumerate() {
            question.check(position, &mut violations);
        }
        violations
    }

    /// Freeze this draft into a quiz with the given identity.
    pub fn to_quiz(&self, id: QuizId, created_at: DateTime<Utc>) -> Result<Quiz, ValidationError> {
        if let Some(first) = self.validate().into_iter().next() {
            return Err(first);
        }
        let questions = self
            .questions
            .iter()
            .enumerate()
            .map(|(position, q)| q.freeze(position))
            .collect::<Result<Vec<_>, _>>()?;
        Quiz::from_parts(
            id,
            self.title.clone(),
            self.description.clone(),
            questions,
            created_at,
        )
    }
}

/// Holds the draft being authored and commits it to a store.
#[derive(Debug, Default)]
pub struct QuizBuilder {
    draft: Draft,
}

impl QuizBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over with a blank draft.
    pub fn reset(&mut self) -> &mut Draft {
        self.draft = Draft::new();
        &mut self.draft
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// Replace the current draft, e.g. with one parsed from a file.
    pub fn load(&mut self, draft: Draft) {
        self.draft = draft;
    }

    pub fn add_question(&mut self) -> usize {
        self.draft.add_question()
    }

    pub fn remove_question(&mut self, index: usize) -> Result<DraftQuestion, ValidationError> {
        self.draft.remove_question(index)
    }

    /// Validate the draft, store it as a new quiz, and start a blank draft.
    ///
    /// If validation or persistence fails the draft and the store are left
    /// as they were.
    pub fn commit(&mut self, store: &mut QuizStore) -> Result<Arc<Quiz>, QuizError> {
        let now = Utc::now();
        let id = store.next_id(now).ok_or(QuizError::IdsExhausted)?;
        let quiz = self.draft.to_quiz(id, now)?;
        let quiz = store.append(quiz)?;
        tracing::info!(
            "committed quiz {} '{}' with {} questions",
            quiz.id(),
            quiz.title(),
            quiz.len()
        );
        self.draft = Draft::new();
        Ok(quiz)
    }
}
