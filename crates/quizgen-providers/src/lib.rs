//! quizgen-providers — LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for OpenAI-compatible APIs (OpenAI,
//! Groq) and Anthropic, plus a scripted mock, and loads the provider
//! configuration that selects between them.

pub mod anthropic;
pub mod config;
mod http;
pub mod mock;
pub mod openai;

pub use config::{create_provider, load_config_from, ConfigError, ProviderConfig, QuizgenConfig};
pub use quizgen_core::error::ProviderError;
