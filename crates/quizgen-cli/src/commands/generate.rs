//! The `quizgen generate` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use quizgen_core::generator::LlmQuestionSource;
use quizgen_core::{QuizRequest, QuizSession};
use quizgen_providers::config::{load_config_from, QuizgenConfig};

use crate::GenerateArgs;

pub async fn execute(args: GenerateArgs, out: PathBuf) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let session = generate_session(&args, &config).await?;

    session.save_json(&out)?;
    println!(
        "Generated {} questions on \"{}\" (quiz {}).",
        session.questions().len(),
        session.topic(),
        session.id().unwrap_or_default()
    );
    println!("Session saved to: {}", out.display());
    Ok(())
}

/// Build the configured provider and generate a fresh quiz.
pub async fn generate_session(args: &GenerateArgs, config: &QuizgenConfig) -> Result<QuizSession> {
    let provider = config.provider(args.provider.as_deref())?;
    let source = LlmQuestionSource::new(
        Arc::from(provider),
        config.generator_config(args.model.as_deref()),
    );
    let request = QuizRequest::new(&args.topic, args.difficulty, args.kind, args.count);

    eprintln!(
        "Generating {} {} {} questions about \"{}\"...",
        request.count, request.difficulty, request.kind, request.topic
    );
    let mut session = QuizSession::new();
    session
        .generate_with_parallelism(&source, &request, config.parallelism)
        .await
        .context("quiz generation failed")?;
    Ok(session)
}
