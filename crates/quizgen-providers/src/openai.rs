//! OpenAI-compatible chat completions provider.
//!
//! Serves OpenAI itself and Groq, which exposes the same API under
//! `https://api.groq.com/openai`.

use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quizgen_core::error::ProviderError;
use quizgen_core::traits::{Completion, CompletionRequest, LlmProvider, ModelInfo, TokenUsage};

use crate::http::{build_client, check_status, transport_error};

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai";

/// OpenAI-compatible API provider.
pub struct OpenAiProvider {
    name: &'static str,
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// A client for the OpenAI API.
    pub fn new(api_key: &str, base_url: Option<String>) -> Result<Self> {
        Self::with_name("openai", api_key, base_url.unwrap_or_else(|| OPENAI_BASE_URL.into()))
    }

    /// A client for Groq's OpenAI-compatible endpoint.
    pub fn groq(api_key: &str, base_url: Option<String>) -> Result<Self> {
        Self::with_name("groq", api_key, base_url.unwrap_or_else(|| GROQ_BASE_URL.into()))
    }

    fn with_name(name: &'static str, api_key: &str, base_url: String) -> Result<Self> {
        Ok(Self {
            name,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client()?,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: ChatUsage,
    model: String,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        self.name
    }

    #[instrument(skip(self, request), fields(provider = self.name, model = %request.model))]
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<Completion> {
        let start = Instant::now();

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = ChatRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response, &request.model).await?;

        let api_response: ChatResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(Completion {
            content,
            model: api_response.model,
            token_usage: TokenUsage {
                prompt_tokens: api_response.usage.prompt_tokens,
                completion_tokens: api_response.usage.completion_tokens,
                total_tokens: api_response.usage.total_tokens,
            },
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        let models: &[(&str, &str, u32)] = match self.name {
            "groq" => &[
                ("llama-3.1-8b-instant", "Llama 3.1 8B Instant", 131_072),
                ("llama-3.3-70b-versatile", "Llama 3.3 70B Versatile", 131_072),
            ],
            _ => &[
                ("gpt-4.1", "GPT-4.1", 1_000_000),
                ("gpt-4.1-mini", "GPT-4.1 Mini", 1_000_000),
            ],
        };
        models
            .iter()
            .map(|(id, name, max_context)| ModelInfo {
                id: id.to_string(),
                name: name.to_string(),
                provider: self.name.to_string(),
                max_context: *max_context,
            })
            .collect()
    }
}
