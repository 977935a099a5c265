//! CSV export of evaluated results.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use quizgen_core::error::PersistError;
use quizgen_core::model::EvaluatedResult;
use quizgen_core::traits::{Download, ResultHandle, ResultSink};

use crate::{read_results, results_file_name, write_results, DEFAULT_RESULTS_DIR};

pub const CONTENT_TYPE: &str = "text/csv";

/// One CSV row. Field order is the header order.
#[derive(Serialize)]
struct Row<'a> {
    question_number: usize,
    question: &'a str,
    question_type: &'static str,
    topic: &'a str,
    quiz_id: &'a str,
    user_answer: &'a str,
    correct_answer: &'a str,
    is_correct: &'static str,
    options: String,
}

/// Writes results as `quiz_results_<topic>_<timestamp>.csv` under a directory.
#[derive(Debug, Clone)]
pub struct CsvResultSink {
    dir: PathBuf,
}

impl Default for CsvResultSink {
    fn default() -> Self {
        Self::new(DEFAULT_RESULTS_DIR)
    }
}

impl CsvResultSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Render the CSV document for `results`.
pub fn render_csv(
    quiz_id: &str,
    topic: &str,
    results: &[EvaluatedResult],
) -> Result<Vec<u8>, PersistError> {
    let encode = |e: ::csv::Error| PersistError::Encode(e.to_string());

    let mut writer = ::csv::Writer::from_writer(Vec::new());
    for result in results {
        writer
            .serialize(Row {
                question_number: result.question_number(),
                question: &result.prompt,
                question_type: result.kind.label(),
                topic,
                quiz_id,
                user_answer: &result.user_answer,
                correct_answer: &result.correct_answer,
                is_correct: if result.is_correct { "True" } else { "False" },
                options: format_options(&result.options),
            })
            .map_err(encode)?;
    }
    writer
        .into_inner()
        .map_err(|e| PersistError::Encode(e.to_string()))
}

/// `['a', 'b']`, or `[]` when there are no options.
fn format_options(options: &[String]) -> String {
    let quoted: Vec<String> = options
        .iter()
        .map(|o| {
            if o.contains('\'') && !o.contains('"') {
                format!("\"{o}\"")
            } else {
                format!("'{}'", o.replace('\\', "\\\\").replace('\'', "\\'"))
            }
        })
        .collect();
    format!("[{}]", quoted.join(", "))
}

impl ResultSink for CsvResultSink {
    fn persist(
        &self,
        quiz_id: &str,
        topic: &str,
        results: &[EvaluatedResult],
        timestamp: DateTime<Local>,
    ) -> Result<ResultHandle, PersistError> {
        if results.is_empty() {
            return Err(PersistError::NothingToPersist);
        }
        let bytes = render_csv(quiz_id, topic, results)?;
        write_results(&self.dir, results_file_name(topic, timestamp, "csv"), &bytes)
    }

    fn retrieve(&self, handle: &ResultHandle) -> Result<Download, PersistError> {
        read_results(handle, CONTENT_TYPE)
    }
}
