//! quizgen-core — Quiz model, session lifecycle, and question generation.
//!
//! This crate defines the question/answer data model, the `QuizSession`
//! state machine that drives generate → answer → evaluate, and the traits
//! that connect it to language-model backends and result storage.

pub mod error;
pub mod generator;
pub mod model;
pub mod prompt;
pub mod retry;
pub mod session;
pub mod traits;

pub use error::{GenerationError, PersistError, ProviderError, QuizError, ValidationError};
pub use model::{Answer, Difficulty, EvaluatedResult, Question, QuestionKind, Score};
pub use session::{QuizRequest, QuizSession, QuizState};
