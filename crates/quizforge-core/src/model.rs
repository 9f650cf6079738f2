//! Committed quiz types and their persisted schema.
//!
//! A `Quiz` can only be obtained by committing a draft or by deserializing a
//! stored record; both paths check the same invariants, so every `Quiz` in
//! memory has a title, at least one question, four non-empty options per
//! question, and a correct answer that indexes one of them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// Identifier assigned to a quiz when it is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizId(pub i64);

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuizId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(QuizId)
            .map_err(|_| format!("invalid quiz id: {s}"))
    }
}

/// A multiple-choice question with one correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    #[serde(rename = "question")]
    text: String,
    options: [String; OPTION_COUNT],
    #[serde(rename = "correctAnswer")]
    correct_index: usize,
}

impl Question {
    /// Build a question, checking it as the `position`-th question of a quiz.
    pub fn new(
        position: usize,
        text: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_index: usize,
    ) -> Result<Self, ValidationError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(ValidationError::QuestionIncomplete { question: position });
        }
        let options = options.map(|o| o.trim().to_string());
        if let Some(option) = options.iter().position(|o| o.is_empty()) {
            return Err(ValidationError::OptionIncomplete {
                question: position,
                option,
            });
        }
        if correct_index >= OPTION_COUNT {
            return Err(ValidationError::AnswerUnselected { question: position });
        }
        Ok(Self {
            text,
            options,
            correct_index,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    /// Text of the option at `index`, if it exists.
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_index
    }
}

/// A committed quiz. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "QuizRecord")]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: String,
    questions: Vec<Question>,
    created_at: DateTime<Utc>,
}

impl Quiz {
    /// Assemble a quiz from already-checked questions.
    pub(crate) fn from_parts(
        id: QuizId,
        title: String,
        description: String,
        questions: Vec<Question>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::TitleMissing);
        }
        if questions.is_empty() {
            return Err(ValidationError::MinimumOneQuestion);
        }
        Ok(Self {
            id,
            title,
            description: description.trim().to_string(),
            questions,
            created_at,
        })
    }

    pub fn id(&self) -> QuizId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// May be empty.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Number of questions; always at least one.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false`: a committed quiz has at least one question.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Stored shape of a quiz, checked before it becomes a `Quiz`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizRecord {
    id: QuizId,
    title: String,
    #[serde(default)]
    description: String,
    questions: Vec<QuestionRecord>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct QuestionRecord {
    question: String,
    options: [String; OPTION_COUNT],
    #[serde(rename = "correctAnswer")]
    correct_answer: usize,
}

impl TryFrom<QuizRecord> for Quiz {
    type Error = ValidationError;

    fn try_from(record: QuizRecord) -> Result<Self, Self::Error> {
        let questions = record
            .questions
            .into_iter()
            .enumerate()
            .map(|(i, q)| Question::new(i, q.question, q.options, q.correct_answer))
            .collect::<Result<Vec<_>, _>>()?;
        Quiz::from_parts(
            record.id,
            record.title,
            record.description,
            questions,
            record.created_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(a: &str, b: &str, c: &str, d: &str) -> [String; OPTION_COUNT] {
        [a.into(), b.into(), c.into(), d.into()]
    }

    #[test]
    fn question_rejects_blank_option() {
        let err = Question::new(2, "Pick one", opts("a", " ", "c", "d"), 0).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OptionIncomplete {
                question: 2,
                option: 1
            }
        );
    }

    #[test]
    fn question_trims_fields() {
        let q = Question::new(0, "  2+2? ", opts(" 3", "4 ", "5", "6"), 1).unwrap();
        assert_eq!(q.text(), "2+2?");
        assert_eq!(q.correct_option(), "4");
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn quiz_id_parse() {
        assert_eq!("1700000000000".parse::<QuizId>().unwrap(), QuizId(1_700_000_000_000));
        assert!("abc".parse::<QuizId>().is_err());
    }

    #[test]
    fn quiz_serializes_with_stored_field_names() {
        let q = Question::new(0, "2+2?", opts("3", "4", "5", "6"), 1).unwrap();
        let quiz = Quiz::from_parts(
            QuizId(42),
            "Math".into(),
            String::new(),
            vec![q],
            DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
                .unwrap()
                .with_timezone(&Utc),
        )
        .unwrap();

        let value = serde_json::to_value(&quiz).unwrap();
        assert_eq!(value["id"], 42);
        assert_eq!(value["createdAt"], "2024-01-02T03:04:05Z");
        assert_eq!(value["questions"][0]["question"], "2+2?");
        assert_eq!(value["questions"][0]["correctAnswer"], 1);
        assert_eq!(value["questions"][0]["options"][3], "6");

        let back: Quiz = serde_json::from_value(value).unwrap();
        assert_eq!(back, quiz);
    }

    #[test]
    fn deserialize_rejects_out_of_range_answer() {
        let json = r#"{
            "id": 1, "title": "T", "description": "",
            "questions": [{"question": "q", "options": ["a","b","c","d"], "correctAnswer": 4}],
            "createdAt": "2024-01-02T03:04:05Z"
        }"#;
        assert!(serde_json::from_str::<Quiz>(json).is_err());
    }

    #[test]
    fn deserialize_rejects_empty_question_list() {
        let json = r#"{
            "id": 1, "title": "T", "questions": [],
            "createdAt": "2024-01-02T03:04:05Z"
        }"#;
        assert!(serde_json::from_str::<Quiz>(json).is_err());
    }
}
