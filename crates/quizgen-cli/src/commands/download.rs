//! The `quizgen download` command.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizgen_core::traits::ResultSink;
use quizgen_report::{content_type_for, handle_for, CsvResultSink, HtmlResultSink};

pub fn execute(file: PathBuf, dest: Option<PathBuf>) -> Result<()> {
    let dir = file.parent().map(PathBuf::from).unwrap_or_default();
    let sink: Box<dyn ResultSink> = match content_type_for(&file) {
        quizgen_report::html::CONTENT_TYPE => Box::new(HtmlResultSink::new(dir)),
        _ => Box::new(CsvResultSink::new(dir)),
    };
    let download = sink.retrieve(&handle_for(&file))?;

    match dest {
        Some(dest) => {
            std::fs::create_dir_all(&dest)
                .with_context(|| format!("failed to create {}", dest.display()))?;
            let path = dest.join(&download.file_name);
            std::fs::write(&path, &download.bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "Downloaded {} ({}, {} bytes) to {}",
                download.file_name,
                download.content_type,
                download.bytes.len(),
                path.display()
            );
        }
        None => {
            eprintln!("{} ({})", download.file_name, download.content_type);
            let mut stdout = std::io::stdout();
            stdout.write_all(&download.bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
