//! The `quizgen quiz` command: generate, answer, evaluate, export.

use std::io;
use std::path::PathBuf;

use anyhow::Result;

use quizgen_providers::config::load_config_from;

use crate::commands::{attempt, export, generate};
use crate::{ExportArgs, GenerateArgs};

pub async fn execute(
    args: GenerateArgs,
    export_args: ExportArgs,
    save_session: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let mut session = generate::generate_session(&args, &config).await?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    attempt::collect_answers(&mut session, &mut stdin.lock(), &mut stdout)?;
    attempt::evaluate_and_report(&mut session, &mut stdout)?;

    export::save_results(&session, &export_args, config.results_dir.clone())?;

    if let Some(path) = save_session {
        session.save_json(&path)?;
        println!("Session saved to: {}", path.display());
    }
    Ok(())
}
