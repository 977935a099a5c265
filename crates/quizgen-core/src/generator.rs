//! LLM-backed question source.
//!
//! Asks a provider for one question at a time, validates the reply against
//! the question schema, and retries malformed or transiently failed attempts
//! within a bounded budget.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::error::{GenerationError, ProviderError, ValidationError};
use crate::model::{Difficulty, FillInBlank, MultipleChoice, Question, QuestionKind, BLANK_MARKER};
use crate::prompt::{question_prompt, SYSTEM_PROMPT};
use crate::retry::{retry, Retry, RetryPolicy};
use crate::traits::{extract_json_object, CompletionRequest, LlmProvider, QuestionSource};

/// Shorter marker some models emit instead of [`BLANK_MARKER`].
const SHORT_BLANK_MARKER: &str = "___";

/// Configuration for [`LlmQuestionSource`].
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Sampling temperature; high values give more varied quizzes.
    pub temperature: f64,
    /// Max tokens per reply.
    pub max_tokens: u32,
    /// Optional system prompt override.
    pub system_prompt_override: Option<String>,
    /// Attempts and backoff per question.
    pub retry: RetryPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.9,
            max_tokens: 512,
            system_prompt_override: None,
            retry: RetryPolicy::default(),
        }
    }
}

/// A [`QuestionSource`] that asks an [`LlmProvider`] for questions.
pub struct LlmQuestionSource {
    provider: Arc<dyn LlmProvider>,
    config: GeneratorConfig,
}

impl LlmQuestionSource {
    pub fn new(provider: Arc<dyn LlmProvider>, config: GeneratorConfig) -> Self {
        Self { provider, config }
    }
}

#[async_trait]
impl QuestionSource for LlmQuestionSource {
    #[instrument(skip(self), fields(provider = %self.provider.name(), model = %self.config.model))]
    async fn generate_one(
        &self,
        topic: &str,
        difficulty: Difficulty,
        kind: QuestionKind,
    ) -> Result<Question, GenerationError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            system_prompt: Some(
                self.config
                    .system_prompt_override
                    .clone()
                    .unwrap_or_else(|| SYSTEM_PROMPT.to_string()),
            ),
            prompt: question_prompt(topic, difficulty, kind),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        let request = &request;

        retry(&self.config.retry, |attempt| async move {
            let completion = self
                .provider
                .complete(request)
                .await
                .map_err(|e| classify_provider_error(attempt, e))?;

            parse_question(&completion.content, kind).map_err(|e| {
                warn!(attempt, error = %e, "discarding invalid {kind} candidate");
                Retry::Transient(anyhow::Error::from(e))
            })
        })
        .await
        .map_err(|e| GenerationError {
            kind,
            attempts: e.attempts,
            reason: format!("{:#}", e.last),
        })
    }
}

/// Decide whether a provider failure is worth another attempt.
fn classify_provider_error(attempt: u32, e: anyhow::Error) -> Retry<anyhow::Error> {
    warn!(attempt, error = %format!("{e:#}"), "provider request failed");
    match e.downcast_ref::<ProviderError>() {
        Some(pe) if pe.is_permanent() => Retry::Permanent(e),
        Some(pe) => match pe.retry_after_ms() {
            Some(ms) => Retry::After(e, Duration::from_millis(ms)),
            None => Retry::Transient(e),
        },
        None => Retry::Transient(e),
    }
}

/// The loosely-shaped JSON a model replies with.
#[derive(Debug, Deserialize)]
struct Candidate {
    question: PromptText,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_answer: String,
    #[serde(default)]
    answer: String,
}

/// Models occasionally echo the field schema back, nesting the question
/// text under `description`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PromptText {
    Text(String),
    Described { description: String },
}

impl PromptText {
    fn into_text(self) -> String {
        match self {
            PromptText::Text(s) | PromptText::Described { description: s } => s,
        }
    }
}

/// Parse and validate a model reply as a question of `kind`.
pub fn parse_question(reply: &str, kind: QuestionKind) -> Result<Question, ValidationError> {
    let json = extract_json_object(reply).ok_or(ValidationError::NoJson)?;
    let candidate: Candidate =
        serde_json::from_str(json).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    let prompt = candidate.question.into_text();

    match kind {
        QuestionKind::MultipleChoice => {
            MultipleChoice::new(prompt, candidate.options, candidate.correct_answer)
                .map(Question::MultipleChoice)
        }
        QuestionKind::FillInBlank => {
            FillInBlank::new(repair_blank_marker(prompt), candidate.answer).map(Question::FillInBlank)
        }
    }
}

/// Widen a short `___` marker to the canonical `_____`, once.
fn repair_blank_marker(prompt: String) -> String {
    if prompt.contains(BLANK_MARKER) {
        prompt
    } else {
        prompt.replace(SHORT_BLANK_MARKER, BLANK_MARKER)
    }
}
