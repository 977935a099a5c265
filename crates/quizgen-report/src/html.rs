//! HTML results page.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use quizgen_core::error::PersistError;
use quizgen_core::model::{EvaluatedResult, Score};
use quizgen_core::traits::{Download, ResultHandle, ResultSink};

use crate::{read_results, results_file_name, write_results, DEFAULT_RESULTS_DIR};

pub const CONTENT_TYPE: &str = "text/html";

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate the results page for one evaluated quiz.
pub fn generate_html(
    quiz_id: &str,
    topic: &str,
    results: &[EvaluatedResult],
    timestamp: DateTime<Local>,
) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Quiz results: {}</title>\n",
        html_escape(topic)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(topic)));
    html.push_str(&format!(
        "<p class=\"meta\">Quiz <code>{}</code> | {} questions | {}</p>\n",
        html_escape(quiz_id),
        results.len(),
        timestamp.format("%Y-%m-%d %H:%M:%S")
    ));
    html.push_str("</header>\n");

    if let Some(score) = Score::from_results(results) {
        let class = if score.percentage >= 80.0 {
            "good"
        } else if score.percentage >= 50.0 {
            "fair"
        } else {
            "poor"
        };
        html.push_str(&format!(
            "<section class=\"score {class}\">Score: {}/{} ({:.1}%)</section>\n",
            score.correct, score.total, score.percentage
        ));
    }

    html.push_str("<section class=\"results\">\n");
    for r in results {
        let (class, verdict) = if r.is_correct {
            ("pass", "Correct")
        } else {
            ("fail", "Incorrect")
        };
        html.push_str(&format!("<article class=\"card {class}\">\n"));
        html.push_str(&format!(
            "<h3>Question {} <span class=\"kind\">{}</span></h3>\n",
            r.question_number(),
            r.kind.label()
        ));
        html.push_str(&format!("<p class=\"prompt\">{}</p>\n", html_escape(&r.prompt)));

        if !r.options.is_empty() {
            html.push_str("<ol class=\"options\">\n");
            for option in &r.options {
                let marker = if *option == r.correct_answer {
                    " class=\"answer\""
                } else {
                    ""
                };
                html.push_str(&format!("<li{marker}>{}</li>\n", html_escape(option)));
            }
            html.push_str("</ol>\n");
        }

        html.push_str(&format!(
            "<p>Your answer: <strong>{}</strong></p>\n",
            html_escape(&r.user_answer)
        ));
        html.push_str(&format!(
            "<p>Correct answer: <strong>{}</strong></p>\n",
            html_escape(&r.correct_answer)
        ));
        html.push_str(&format!("<p class=\"verdict\">{verdict}</p>\n"));
        html.push_str("</article>\n");
    }
    html.push_str("</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Writes results as `quiz_results_<topic>_<timestamp>.html` under a directory.
#[derive(Debug, Clone)]
pub struct HtmlResultSink {
    dir: PathBuf,
}

impl Default for HtmlResultSink {
    fn default() -> Self {
        Self::new(DEFAULT_RESULTS_DIR)
    }
}

impl HtmlResultSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ResultSink for HtmlResultSink {
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
        let html = generate_html(quiz_id, topic, results, timestamp);
        write_results(
            &self.dir,
            results_file_name(topic, timestamp, "html"),
            html.as_bytes(),
        )
    }

    fn retrieve(&self, handle: &ResultHandle) -> Result<Download, PersistError> {
        read_results(handle, CONTENT_TYPE)
    }
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 48rem; padding: 2rem; background: var(--bg); color: var(--fg); }
.meta { color: #6b7280; }
.score { font-size: 1.5rem; font-weight: bold; padding: 1rem; border-radius: 8px; margin: 1rem 0; }
.score.good { background: var(--pass); }
.score.fair { background: #fef9c3; color: #1a1a1a; }
.score.poor { background: var(--fail); }
.card { border: 1px solid var(--border); border-radius: 8px; padding: 0 1rem; margin: 1rem 0; }
.card.pass { border-left: 6px solid #22c55e; }
.card.fail { border-left: 6px solid #ef4444; }
.kind { font-size: 0.8rem; font-weight: normal; color: #6b7280; }
.options .answer { font-weight: bold; }
.verdict { font-weight: bold; }
.pass .verdict { color: #16a34a; }
.fail .verdict { color: #dc2626; }
"#;
