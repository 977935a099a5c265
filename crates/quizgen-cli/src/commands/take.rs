//! The `quizgen take` command.

use std::io;
use std::path::PathBuf;

use anyhow::Result;

use quizgen_core::QuizSession;
use quizgen_providers::config::load_config_from;

use crate::commands::{attempt, export};
use crate::ExportArgs;

pub fn execute(session_path: PathBuf, export_args: ExportArgs, config: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config.as_deref())?;
    let mut session = QuizSession::load_json(&session_path)?;

    if !session.topic().is_empty() {
        println!(
            "Quiz on \"{}\" ({} {} questions)",
            session.topic(),
            session.questions().len(),
            session.difficulty()
        );
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    attempt::collect_answers(&mut session, &mut stdin.lock(), &mut stdout)?;
    attempt::evaluate_and_report(&mut session, &mut stdout)?;

    export::save_results(&session, &export_args, config.results_dir.clone())?;
    session.save_json(&session_path)?;
    Ok(())
}
