//! Mock provider for tests and offline runs.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizgen_core::traits::{Completion, CompletionRequest, LlmProvider, ModelInfo, TokenUsage};

/// A mock LLM provider that replays scripted replies.
///
/// Replies are handed out in order; once the script runs out the last
/// reply repeats.
pub struct MockProvider {
    replies: Vec<String>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<CompletionRequest>>,
}

impl MockProvider {
    /// Create a mock that replies with `replies` in order.
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same reply.
    pub fn with_fixed_response(reply: &str) -> Self {
        Self::new(vec![reply.to_string()])
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<Completion> {
        let call = self.call_count.fetch_add(1, Ordering::Relaxed) as usize;
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let content = self
            .replies
            .get(call)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or_default();
        let completion_tokens = (content.len() / 4) as u32; // Rough estimate
        let prompt_tokens = (request.prompt.len() / 4) as u32;

        Ok(Completion {
            content,
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
            latency_ms: 1,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            model: "mock-model".into(),
            system_prompt: None,
            prompt: prompt.into(),
            max_tokens: 100,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn fixed_response() {
        let provider = MockProvider::with_fixed_response("{\"question\": \"q\"}");

        let completion = provider.complete(&request("anything")).await.unwrap();
        assert_eq!(completion.content, "{\"question\": \"q\"}");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn scripted_replies_then_repeat_last() {
        let provider = MockProvider::new(vec!["first".into(), "second".into()]);

        let mut seen = Vec::new();
        for prompt in ["a", "b", "c"] {
            seen.push(provider.complete(&request(prompt)).await.unwrap().content);
        }

        assert_eq!(seen, ["first", "second", "second"]);
        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.last_request().unwrap().prompt, "c");
    }
}
