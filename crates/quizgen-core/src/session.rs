//! The quiz session state machine.
//!
//! A session owns one quiz attempt: the generated questions, the user's
//! answers at the same indices, and the evaluated results. It moves through
//! `Empty → Generated → Answering → Evaluated`.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::QuizError;
use crate::model::{Answer, Difficulty, EvaluatedResult, Question, QuestionKind, Score};
use crate::traits::QuestionSource;

/// Largest quiz a single request may ask for.
pub const MAX_QUESTIONS: usize = 50;

/// Lifecycle state of a [`QuizSession`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizState {
    #[default]
    Empty,
    Generated,
    Answering,
    Evaluated,
}

impl fmt::Display for QuizState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizState::Empty => write!(f, "empty"),
            QuizState::Generated => write!(f, "generated"),
            QuizState::Answering => write!(f, "in progress"),
            QuizState::Evaluated => write!(f, "evaluated"),
        }
    }
}

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRequest {
    pub topic: String,
    pub difficulty: Difficulty,
    pub kind: QuestionKind,
    pub count: usize,
}

impl QuizRequest {
    pub fn new(
        topic: impl Into<String>,
        difficulty: Difficulty,
        kind: QuestionKind,
        count: usize,
    ) -> Self {
        Self {
            topic: topic.into(),
            difficulty,
            kind,
            count,
        }
    }

    /// Check the topic is non-blank and the count is within `1..=MAX_QUESTIONS`.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.topic.trim().is_empty() {
            return Err(QuizError::EmptyTopic);
        }
        if !(1..=MAX_QUESTIONS).contains(&self.count) {
            return Err(QuizError::InvalidCount {
                count: self.count,
                max: MAX_QUESTIONS,
            });
        }
        Ok(())
    }
}

/// One quiz attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizSession {
    id: Option<String>,
    #[serde(default)]
    topic: String,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    kind: Option<QuestionKind>,
    #[serde(default)]
    state: QuizState,
    #[serde(default)]
    questions: Vec<Question>,
    #[serde(default)]
    answers: Vec<Answer>,
    #[serde(default)]
    results: Vec<EvaluatedResult>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opaque grouping key for this quiz; `None` until generated.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn kind(&self) -> Option<QuestionKind> {
        self.kind
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn results(&self) -> &[EvaluatedResult] {
        &self.results
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Generate a fresh quiz, one question at a time.
    pub async fn generate(
        &mut self,
        source: &dyn QuestionSource,
        request: &QuizRequest,
    ) -> Result<(), QuizError> {
        self.generate_with_parallelism(source, request, 1).await
    }

    /// Generate a fresh quiz with up to `parallelism` requests in flight.
    ///
    /// Questions keep their request order. Any failure aborts the whole
    /// batch and leaves the session exactly as it was.
    pub async fn generate_with_parallelism(
        &mut self,
        source: &dyn QuestionSource,
        request: &QuizRequest,
        parallelism: usize,
    ) -> Result<(), QuizError> {
        request.validate()?;
        if matches!(self.state, QuizState::Generated | QuizState::Answering) {
            return Err(QuizError::InvalidState {
                operation: "generate a new quiz",
                state: self.state,
            });
        }

        let questions: Vec<Question> = stream::iter(0..request.count)
            .map(move |i| {
                debug!(question = i + 1, total = request.count, "requesting question");
                source.generate_one(&request.topic, request.difficulty, request.kind)
            })
            .buffered(parallelism.max(1))
            .try_collect()
            .await?;

        let created_at = Utc::now();
        let id = quiz_id(request, created_at);
        info!(
            quiz_id = %id,
            topic = %request.topic,
            kind = %request.kind,
            difficulty = %request.difficulty,
            count = questions.len(),
            "generated quiz"
        );

        self.id = Some(id);
        self.topic = request.topic.clone();
        self.difficulty = request.difficulty;
        self.kind = Some(request.kind);
        self.answers = questions.iter().map(Question::blank_answer).collect();
        self.questions = questions;
        self.results.clear();
        self.created_at = Some(created_at);
        self.state = QuizState::Generated;
        Ok(())
    }

    /// Record the answer to question `index`, replacing any earlier answer.
    ///
    /// Answering after evaluation is allowed; the previous results stay
    /// until the next [`evaluate`](Self::evaluate).
    pub fn record_answer(&mut self, index: usize, answer: Answer) -> Result<(), QuizError> {
        if self.state == QuizState::Empty {
            return Err(QuizError::InvalidState {
                operation: "record an answer",
                state: self.state,
            });
        }
        let question = self
            .questions
            .get(index)
            .ok_or(QuizError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            })?;
        if answer.kind() != question.kind() {
            return Err(QuizError::AnswerKindMismatch {
                number: index + 1,
                expected: question.kind(),
            });
        }

        debug!(question = index + 1, ?answer, "recorded answer");
        self.answers[index] = answer;
        self.state = QuizState::Answering;
        Ok(())
    }

    /// Score every question against its answer, replacing earlier results.
    ///
    /// With no questions this yields an empty slice and the state stays `Empty`.
    pub fn evaluate(&mut self) -> &[EvaluatedResult] {
        self.results = self
            .questions
            .iter()
            .zip(&self.answers)
            .enumerate()
            .map(|(i, (question, answer))| question.evaluate(i, answer))
            .collect();

        if !self.questions.is_empty() {
            self.state = QuizState::Evaluated;
            let correct = self.results.iter().filter(|r| r.is_correct).count();
            info!(
                quiz_id = self.id.as_deref().unwrap_or_default(),
                correct,
                total = self.results.len(),
                "evaluated quiz"
            );
        }
        &self.results
    }

    /// Score derived from the latest results.
    pub fn score(&self) -> Result<Score, QuizError> {
        Score::from_results(&self.results).ok_or(QuizError::EmptyResults)
    }

    /// Discard the current quiz and return to `Empty`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Save the session as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize session")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write session to {}", path.display()))?;
        Ok(())
    }

    /// Load a session from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session from {}", path.display()))?;
        let session: QuizSession =
            serde_json::from_str(&content).context("failed to parse session JSON")?;
        session
            .check_consistency()
            .with_context(|| format!("inconsistent session file {}", path.display()))?;
        Ok(session)
    }

    fn check_consistency(&self) -> Result<()> {
        anyhow::ensure!(
            self.answers.len() == self.questions.len(),
            "{} answers for {} questions",
            self.answers.len(),
            self.questions.len()
        );
        for (i, (q, a)) in self.questions.iter().zip(&self.answers).enumerate() {
            anyhow::ensure!(
                q.kind() == a.kind(),
                "answer {} does not match its {} question",
                i + 1,
                q.kind()
            );
        }
        anyhow::ensure!(
            self.results.is_empty() || self.results.len() == self.questions.len(),
            "{} results for {} questions",
            self.results.len(),
            self.questions.len()
        );
        match self.state {
            QuizState::Generated => {
                anyhow::ensure!(
                    self.results.is_empty(),
                    "state generated with {} results",
                    self.results.len()
                );
            }
            QuizState::Evaluated => {
                anyhow::ensure!(
                    self.results.len() == self.questions.len(),
                    "state evaluated with {} results for {} questions",
                    self.results.len(),
                    self.questions.len()
                );
            }
            QuizState::Empty | QuizState::Answering => {}
        }
        anyhow::ensure!(
            (self.state == QuizState::Empty) == self.questions.is_empty(),
            "state {} does not match {} questions",
            self.state,
            self.questions.len()
        );
        Ok(())
    }
}

/// First 8 hex digits of a name-based UUID over the request and time.
fn quiz_id(request: &QuizRequest, at: DateTime<Utc>) -> String {
    let name = format!(
        "{}_{}_{}_{}",
        request.topic,
        request.kind,
        request.difficulty,
        at.timestamp_nanos_opt().unwrap_or_else(|| at.timestamp_micros())
    );
    let mut id = Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
        .simple()
        .to_string();
    id.truncate(8);
    id
}
