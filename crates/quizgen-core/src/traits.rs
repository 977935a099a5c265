//! Core trait definitions for LLM providers, question sources, and result sinks.
//!
//! `LlmProvider` is implemented by the `quizgen-providers` crate and
//! `ResultSink` by `quizgen-report`. `QuestionSource` is implemented here by
//! [`crate::generator::LlmQuestionSource`].

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, PersistError};
use crate::model::{Difficulty, EvaluatedResult, Question, QuestionKind};

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for LLM backends that complete a prompt with text.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "groq").
    fn name(&self) -> &str;

    /// Send one prompt and return the model's reply.
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<Completion>;

    /// List known models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// A single-turn completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier (e.g. "llama-3.1-8b-instant").
    pub model: String,
    /// Optional system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// The user prompt.
    pub prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// The model's reply to a [`CompletionRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// The raw reply text.
    pub content: String,
    /// Model that actually produced the reply.
    pub model: String,
    /// Token usage.
    #[serde(default)]
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token counts reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

// ---------------------------------------------------------------------------
// Question source
// ---------------------------------------------------------------------------

/// Produces one validated question at a time.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Generate a single question, retrying internally on malformed
    /// candidates. Fails only once the source's retry budget is spent.
    async fn generate_one(
        &self,
        topic: &str,
        difficulty: Difficulty,
        kind: QuestionKind,
    ) -> Result<Question, GenerationError>;
}

// ---------------------------------------------------------------------------
// Result sink
// ---------------------------------------------------------------------------

/// Durable storage for evaluated quiz results.
pub trait ResultSink {
    /// Write `results` and return a handle for retrieving them later.
    ///
    /// Fails with [`PersistError::NothingToPersist`] without touching
    /// storage when `results` is empty.
    fn persist(
        &self,
        quiz_id: &str,
        topic: &str,
        results: &[EvaluatedResult],
        timestamp: DateTime<Local>,
    ) -> Result<ResultHandle, PersistError>;

    /// Re-read previously persisted results byte for byte.
    fn retrieve(&self, handle: &ResultHandle) -> Result<Download, PersistError>;
}

/// Where a sink put a set of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultHandle {
    pub path: PathBuf,
    pub file_name: String,
}

/// Persisted results, ready to hand to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// JSON extraction
// ---------------------------------------------------------------------------

/// Extract the JSON object from an LLM reply.
///
/// Handles:
/// - ```json``` fenced blocks (preferred)
/// - Generic ``` blocks
/// - Bare JSON surrounded by prose (outermost `{ ... }` span)
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let mut generic_block = None;
    let mut rest = reply;

    while let Some(open) = rest.find("```") {
        let after_fence = &rest[open + 3..];
        let line_end = after_fence.find('\n').unwrap_or(after_fence.len());
        let lang = after_fence[..line_end].trim().to_lowercase();
        let body_start = (line_end + 1).min(after_fence.len());
        let body = &after_fence[body_start..];
        // Unclosed fences (truncated replies) run to the end.
        let (block, next) = match body.find("```") {
            Some(close) => (&body[..close], &body[close + 3..]),
            None => (body, ""),
        };

        if lang == "json" {
            if let Some(obj) = braces_span(block) {
                return Some(obj);
            }
        } else if lang.is_empty() && generic_block.is_none() {
            generic_block = braces_span(block);
        }
        rest = next;
    }

    generic_block.or_else(|| braces_span(reply))
}

fn braces_span(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let end = s.rfind('}')?;
    (end > start).then(|| &s[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_fenced_block() {
        let input = r#"Here is your question:

```json
{"question": "What is 2 + 2?", "answer": "4"}
```

Good luck!"#;
        assert_eq!(
            extract_json_object(input),
            Some(r#"{"question": "What is 2 + 2?", "answer": "4"}"#)
        );
    }

    #[test]
    fn extract_prefers_json_over_generic() {
        let input = "```\n{\"generic\": true}\n```\n\n```json\n{\"specific\": true}\n```";
        assert_eq!(extract_json_object(input), Some("{\"specific\": true}"));
    }

    #[test]
    fn extract_generic_block_fallback() {
        let input = "```\n{\"question\": \"q\"}\n```";
        assert_eq!(extract_json_object(input), Some("{\"question\": \"q\"}"));
    }

    #[test]
    fn extract_bare_object_in_prose() {
        let input = "Sure! {\"question\": \"q\", \"answer\": \"a\"} Hope that helps.";
        assert_eq!(
            extract_json_object(input),
            Some("{\"question\": \"q\", \"answer\": \"a\"}")
        );
    }

    #[test]
    fn extract_truncated_unclosed_block() {
        let input = "```json\n{\"question\": \"q\", \"answer\": \"a\"}";
        assert_eq!(
            extract_json_object(input),
            Some("{\"question\": \"q\", \"answer\": \"a\"}")
        );
    }

    #[test]
    fn extract_nothing() {
        assert_eq!(extract_json_object("I cannot help with that."), None);
    }
}
