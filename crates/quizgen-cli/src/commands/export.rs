//! Saving evaluated sessions in the requested formats.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;

use quizgen_core::traits::ResultSink;
use quizgen_core::{PersistError, QuizSession};
use quizgen_report::{CsvResultSink, HtmlResultSink};

use crate::{ExportArgs, ExportFormat};

/// Persist the session's results in each format named by `args.format`.
pub fn save_results(session: &QuizSession, args: &ExportArgs, default_dir: PathBuf) -> Result<()> {
    if args.no_save {
        return Ok(());
    }
    let dir = args.output.clone().unwrap_or(default_dir);
    let formats: &[ExportFormat] = match args.format {
        ExportFormat::All => &[ExportFormat::Csv, ExportFormat::Html],
        ExportFormat::Csv => &[ExportFormat::Csv],
        ExportFormat::Html => &[ExportFormat::Html],
    };

    let timestamp = Local::now();
    let quiz_id = session.id().unwrap_or_default();

    for fmt in formats {
        let sink: Box<dyn ResultSink> = match fmt {
            ExportFormat::Html => Box::new(HtmlResultSink::new(&dir)),
            ExportFormat::Csv | ExportFormat::All => Box::new(CsvResultSink::new(&dir)),
        };
        match sink.persist(quiz_id, session.topic(), session.results(), timestamp) {
            Ok(handle) => println!("Results saved to: {}", handle.path.display()),
            Err(PersistError::NothingToPersist) => {
                eprintln!("Warning: no results to save.");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
