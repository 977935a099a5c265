//! Error types shared across quizgen.
//!
//! `ProviderError` lives here rather than in `quizgen-providers` so the
//! question generator can downcast and classify failures for retry
//! decisions without string matching.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::QuestionKind;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// A candidate question that does not satisfy the question schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("expected exactly 4 options, got {0}")]
    WrongOptionCount(usize),

    #[error("duplicate option: {0:?}")]
    DuplicateOption(String),

    #[error("correct answer {0:?} is not one of the options")]
    CorrectAnswerNotInOptions(String),

    #[error("question is missing the blank marker '_____'")]
    MissingBlankMarker,

    #[error("reply did not contain a JSON object")]
    NoJson,

    #[error("malformed question JSON: {0}")]
    Malformed(String),
}

/// The question source gave up after exhausting its retry budget.
#[derive(Debug, Error)]
#[error("failed to generate a valid {kind} question after {attempts} attempt(s): {reason}")]
pub struct GenerationError {
    pub kind: QuestionKind,
    pub attempts: u32,
    pub reason: String,
}

/// Errors raised by the quiz session state machine.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("topic must not be empty")]
    EmptyTopic,

    #[error("question count must be between 1 and {max}, got {count}")]
    InvalidCount { count: usize, max: usize },

    #[error("cannot {operation} while the quiz is {state}")]
    InvalidState {
        operation: &'static str,
        state: crate::session::QuizState,
    },

    #[error("question index {index} is out of range (quiz has {len} questions)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("answer for question {number} must be a {expected} answer")]
    AnswerKindMismatch { number: usize, expected: QuestionKind },

    #[error("no results to score; evaluate the quiz first")]
    EmptyResults,

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Errors raised when persisting or retrieving evaluated results.
#[derive(Debug, Error)]
pub enum PersistError {
    /// There are no evaluated results; nothing was written.
    #[error("no results to save")]
    NothingToPersist,

    #[error("results file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode results: {0}")]
    Encode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_provider_errors() {
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("gpt-9".into()).is_permanent());
        assert!(!ProviderError::Timeout(120).is_permanent());
        assert!(!ProviderError::RateLimited { retry_after_ms: 10 }.is_permanent());
    }

    #[test]
    fn retry_after_only_for_rate_limits() {
        assert_eq!(
            ProviderError::RateLimited { retry_after_ms: 5000 }.retry_after_ms(),
            Some(5000)
        );
        assert_eq!(ProviderError::NetworkError("reset".into()).retry_after_ms(), None);
    }

    #[test]
    fn generation_error_message() {
        let err = GenerationError {
            kind: QuestionKind::FillInBlank,
            attempts: 3,
            reason: "question is missing the blank marker '_____'".into(),
        };
        assert_eq!(
            err.to_string(),
            "failed to generate a valid fill-in-blank question after 3 attempt(s): \
             question is missing the blank marker '_____'"
        );
    }
}
