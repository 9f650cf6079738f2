//! quizforge-core — Quiz lifecycle engine.
//!
//! Authoring drafts, committing them to a persistent store, playing a quiz
//! one question at a time, and scoring the finished play-through. Rendering
//! is left to callers; the `render` module turns engine state into plain
//! view models they can print or template.

pub mod backend;
pub mod builder;
pub mod config;
pub mod draft_file;
pub mod error;
pub mod model;
pub mod render;
pub mod scorer;
pub mod session;
pub mod store;

pub use builder::{Draft, DraftQuestion, QuizBuilder};
pub use error::{PersistenceError, QuizError, ValidationError};
pub use model::{Question, Quiz, QuizId, OPTION_COUNT};
pub use scorer::{evaluate, QuestionReview, QuizResult};
pub use session::{Session, SessionState};
pub use store::QuizStore;
