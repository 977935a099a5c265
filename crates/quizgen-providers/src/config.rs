//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quizgen_core::generator::GeneratorConfig;
use quizgen_core::retry::RetryPolicy;
use quizgen_core::traits::LlmProvider;

use crate::anthropic::AnthropicProvider;
use crate::mock::MockProvider;
use crate::openai::OpenAiProvider;

/// Environment variable that overrides the default provider's API key.
pub const API_KEY_ENV: &str = "QUIZGEN_API_KEY";

/// Configuration problems detected before any question is requested.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key for provider '{provider}'; set {env} or add api_key to quizgen.toml")]
    MissingApiKey { provider: String, env: &'static str },

    #[error("provider '{name}' not found in config. Available: {available:?}")]
    UnknownProvider { name: String, available: Vec<String> },
}

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Groq {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Anthropic {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    /// Scripted replies, for demos and tests without network access.
    Mock {
        #[serde(default)]
        responses: Vec<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Groq { base_url, .. } => f
                .debug_struct("Groq")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI { base_url, .. } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Anthropic { base_url, .. } => f
                .debug_struct("Anthropic")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mock { responses } => f
                .debug_struct("Mock")
                .field("responses", &responses.len())
                .finish(),
        }
    }
}

impl ProviderConfig {
    /// The conventional environment variable holding this provider's key.
    fn key_env(&self) -> &'static str {
        match self {
            ProviderConfig::Groq { .. } => "GROQ_API_KEY",
            ProviderConfig::OpenAI { .. } => "OPENAI_API_KEY",
            ProviderConfig::Anthropic { .. } => "ANTHROPIC_API_KEY",
            ProviderConfig::Mock { .. } => API_KEY_ENV,
        }
    }

    fn api_key_mut(&mut self) -> Option<&mut String> {
        match self {
            ProviderConfig::Groq { api_key, .. }
            | ProviderConfig::OpenAI { api_key, .. }
            | ProviderConfig::Anthropic { api_key, .. } => Some(api_key),
            ProviderConfig::Mock { .. } => None,
        }
    }

    fn groq_from_env() -> Self {
        ProviderConfig::Groq {
            api_key: "${GROQ_API_KEY}".to_string(),
            base_url: None,
        }
    }
}

/// Top-level quizgen configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizgenConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default model to use.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature for generation.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Max tokens per generated question.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Attempts per question before generation fails.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Initial delay between attempts in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Questions requested concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Directory for exported results.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

fn default_provider() -> String {
    "groq".to_string()
}
fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}
fn default_temperature() -> f64 {
    0.9
}
fn default_max_tokens() -> u32 {
    512
}
fn default_max_attempts() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    500
}
fn default_parallelism() -> usize {
    1
}
fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

impl Default for QuizgenConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay(),
            parallelism: default_parallelism(),
            results_dir: default_results_dir(),
        }
    }
}

impl QuizgenConfig {
    /// Generator settings for `model`, or the configured default model.
    pub fn generator_config(&self, model: Option<&str>) -> GeneratorConfig {
        GeneratorConfig {
            model: model.unwrap_or(&self.default_model).to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            system_prompt_override: None,
            retry: RetryPolicy {
                max_attempts: self.max_attempts,
                initial_delay: Duration::from_millis(self.retry_delay_ms),
                ..RetryPolicy::default()
            },
        }
    }

    /// Build the named provider, or the default one.
    pub fn provider(&self, name: Option<&str>) -> Result<Box<dyn LlmProvider>> {
        let name = name.unwrap_or(&self.default_provider);
        let config = self.providers.get(name).ok_or_else(|| {
            let mut available: Vec<String> = self.providers.keys().cloned().collect();
            available.sort();
            ConfigError::UnknownProvider {
                name: name.to_string(),
                available,
            }
        })?;
        create_provider(name, config)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Unset variables resolve to the empty string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    let resolve_url = |u: &Option<String>| u.as_deref().map(resolve_env_vars);
    match config {
        ProviderConfig::Groq { api_key, base_url } => ProviderConfig::Groq {
            api_key: resolve_env_vars(api_key),
            base_url: resolve_url(base_url),
        },
        ProviderConfig::OpenAI { api_key, base_url } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: resolve_url(base_url),
        },
        ProviderConfig::Anthropic { api_key, base_url } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(api_key),
            base_url: resolve_url(base_url),
        },
        ProviderConfig::Mock { responses } => ProviderConfig::Mock {
            responses: responses.clone(),
        },
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizgen.toml` in the current directory
/// 2. `~/.config/quizgen/config.toml`
///
/// A `groq` provider reading `${GROQ_API_KEY}` is always available, and
/// `QUIZGEN_API_KEY` overrides the default provider's key.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizgenConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizgen.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizgenConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizgenConfig::default(),
    };

    config
        .providers
        .entry("groq".into())
        .or_insert_with(ProviderConfig::groq_from_env);

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if let Some(api_key) = config
            .providers
            .get_mut(&config.default_provider)
            .and_then(ProviderConfig::api_key_mut)
        {
            *api_key = key;
        }
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizgen"))
}

/// Create a provider instance from its configuration.
///
/// Fails with [`ConfigError::MissingApiKey`] when the key resolved to
/// nothing, so a missing credential surfaces before the first question.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    let require_key = |api_key: &str| -> Result<()> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey {
                provider: name.to_string(),
                env: config.key_env(),
            }
            .into());
        }
        Ok(())
    };

    match config {
        ProviderConfig::Groq { api_key, base_url } => {
            require_key(api_key)?;
            Ok(Box::new(OpenAiProvider::groq(api_key, base_url.clone())?))
        }
        ProviderConfig::OpenAI { api_key, base_url } => {
            require_key(api_key)?;
            Ok(Box::new(OpenAiProvider::new(api_key, base_url.clone())?))
        }
        ProviderConfig::Anthropic { api_key, base_url } => {
            require_key(api_key)?;
            Ok(Box::new(AnthropicProvider::new(api_key, base_url.clone())?))
        }
        ProviderConfig::Mock { responses } => Ok(Box::new(MockProvider::new(responses.clone()))),
    }
}
