//! quizgen-report — Export of evaluated quiz results.
//!
//! Results are written under a results directory as CSV (the canonical
//! download format) or as a self-contained HTML page.

pub mod csv;
pub mod html;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use quizgen_core::error::PersistError;
use quizgen_core::traits::{Download, ResultHandle};

pub use crate::csv::CsvResultSink;
pub use crate::html::{generate_html, HtmlResultSink};

/// Default directory for exported results.
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_topic(topic: &str) -> String {
    topic
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `quiz_results_<topic>_<YYYYMMDD_HHMMSS>.<extension>`
pub fn results_file_name(topic: &str, timestamp: DateTime<Local>, extension: &str) -> String {
    format!(
        "quiz_results_{}_{}.{extension}",
        sanitize_topic(topic),
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

/// Guess the content type of an exported file from its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => crate::html::CONTENT_TYPE,
        _ => crate::csv::CONTENT_TYPE,
    }
}

/// Write `bytes` to `dir/file_name`, creating `dir` if needed.
fn write_results(dir: &Path, file_name: String, bytes: &[u8]) -> Result<ResultHandle, PersistError> {
    std::fs::create_dir_all(dir).map_err(io_err(dir))?;
    let path = dir.join(&file_name);
    std::fs::write(&path, bytes).map_err(io_err(&path))?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "saved results");
    Ok(ResultHandle { path, file_name })
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PersistError {
    let path = path.to_path_buf();
    move |source| PersistError::Io { path, source }
}

/// Read back a file written by one of the sinks.
fn read_results(handle: &ResultHandle, content_type: &'static str) -> Result<Download, PersistError> {
    let bytes = std::fs::read(&handle.path).map_err(io_err(&handle.path))?;
    Ok(Download {
        file_name: handle.file_name.clone(),
        content_type,
        bytes,
    })
}

/// Build a handle for a results file that already exists on disk.
pub fn handle_for(path: impl Into<PathBuf>) -> ResultHandle {
    let path = path.into();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    ResultHandle { path, file_name }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_topic("World War II"), "World_War_II");
        assert_eq!(sanitize_topic("C++/Rust: basics"), "C___Rust__basics");
        assert_eq!(sanitize_topic("../etc"), "___etc");
        assert_eq!(sanitize_topic("rust-lang_101"), "rust-lang_101");
    }

    #[test]
    fn file_name_embeds_topic_and_timestamp() {
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            results_file_name("Solar System", ts, "csv"),
            "quiz_results_Solar_System_20240309_140507.csv"
        );
    }

    #[test]
    fn content_type_from_extension() {
        assert_eq!(content_type_for(Path::new("a/b.csv")), "text/csv");
        assert_eq!(content_type_for(Path::new("b.html")), "text/html");
    }

    #[test]
    fn handle_for_existing_file() {
        let handle = handle_for("results/quiz_results_x_20240101_000000.csv");
        assert_eq!(handle.file_name, "quiz_results_x_20240101_000000.csv");
    }
}
