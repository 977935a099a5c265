//! CLI integration tests using assert_cmd.
//!
//! Every test runs in its own directory with a `quizgen.toml` that points
//! at the scripted mock provider, so nothing touches the network.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CAPITAL_MCQ: &str = r#"{"question": "What is the capital of France?", "options": ["London", "Berlin", "Paris", "Madrid"], "correct_answer": "Paris"}"#;
const CAPITAL_FILL: &str = r#"{"question": "The capital of France is _____.", "answer": "Paris"}"#;

/// A command isolated from the caller's config and API keys.
fn quizgen(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizgen").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("GROQ_API_KEY")
        .env_remove("QUIZGEN_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

/// A temp dir with a config whose default provider replays `reply`.
fn mock_workspace(reply: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("quizgen.toml"),
        format!(
            r#"default_provider = "offline"
default_model = "mock-model"
retry_delay_ms = 0

[providers.offline]
type = "mock"
responses = ['{reply}']
"#
        ),
    )
    .unwrap();
    dir
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    files.sort();
    files
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    quizgen(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("LLM-generated quizzes"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    quizgen(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizgen"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    quizgen(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizgen.toml"));

    let content = std::fs::read_to_string(dir.path().join("quizgen.toml")).unwrap();
    assert!(content.contains("${GROQ_API_KEY}"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    // First init
    quizgen(dir.path()).arg("init").assert().success();

    // Second init should skip
    quizgen(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn quiz_scores_and_saves_csv() {
    let dir = mock_workspace(CAPITAL_MCQ);

    quizgen(dir.path())
        .args(["quiz", "--topic", "European Capitals", "--count", "2"])
        .write_stdin("3\n1,2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1/2: What is the capital of France?"))
        .stdout(predicate::str::contains("3. Paris"))
        .stdout(predicate::str::contains("Score: 1/2 (50.0%)"))
        .stdout(predicate::str::contains("Results saved to:"));

    let files = files_in(&dir.path().join("results"));
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("quiz_results_European_Capitals_"));
    assert!(name.ends_with(".csv"));

    let content = std::fs::read_to_string(&files[0]).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "question_number,question,question_type,topic,quiz_id,user_answer,correct_answer,is_correct,options"
    );
    assert!(lines.next().unwrap().contains(",MCQ,European Capitals,"));
    let second = lines.next().unwrap();
    assert!(second.contains("\"London, Berlin\""));
    assert!(second.contains(",False,"));
}

#[test]
fn quiz_fill_in_ignores_case_and_spacing() {
    let dir = mock_workspace(CAPITAL_FILL);

    quizgen(dir.path())
        .args(["quiz", "--topic", "Geography", "--kind", "fill", "--count", "1", "--no-save"])
        .write_stdin("  PARIS \n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 1/1 (100.0%)"));

    assert!(!dir.path().join("results").exists());
}

#[test]
fn quiz_reprompts_on_invalid_choice() {
    let dir = mock_workspace(CAPITAL_MCQ);

    quizgen(dir.path())
        .args(["quiz", "--topic", "Geography", "--count", "1", "--no-save"])
        .write_stdin("9\n3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("'9' is not an option between 1 and 4"))
        .stdout(predicate::str::contains("Score: 1/1 (100.0%)"));
}

#[test]
fn quiz_without_input_counts_as_unanswered() {
    let dir = mock_workspace(CAPITAL_MCQ);

    quizgen(dir.path())
        .args(["quiz", "--topic", "Geography", "--count", "1", "--no-save"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("No selection"))
        .stdout(predicate::str::contains("Score: 0/1 (0.0%)"));
}

#[test]
fn generate_then_take() {
    let dir = mock_workspace(CAPITAL_MCQ);

    quizgen(dir.path())
        .args(["generate", "--topic", "Geography", "--count", "1", "--out", "session.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 1 questions"));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("session.json")).unwrap())
            .unwrap();
    assert_eq!(saved["state"], "generated");

    quizgen(dir.path())
        .args(["take", "--session", "session.json", "--format", "all"])
        .write_stdin("3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 1/1 (100.0%)"));

    let files = files_in(&dir.path().join("results"));
    assert_eq!(files.len(), 2);
    assert!(files.iter().any(|f| f.extension().unwrap() == "csv"));
    assert!(files.iter().any(|f| f.extension().unwrap() == "html"));

    let taken: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("session.json")).unwrap())
            .unwrap();
    assert_eq!(taken["state"], "evaluated");
    assert_eq!(taken["results"][0]["is_correct"], true);
}

#[test]
fn take_empty_session_warns_instead_of_failing() {
    let dir = mock_workspace(CAPITAL_MCQ);
    std::fs::write(dir.path().join("empty.json"), "{}").unwrap();

    quizgen(dir.path())
        .args(["take", "--session", "empty.json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("no results to score"))
        .stderr(predicate::str::contains("no results to save"));

    assert!(!dir.path().join("results").exists());
}

#[test]
fn download_copies_results_file() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results");
    std::fs::create_dir_all(&results).unwrap();
    let file = results.join("quiz_results_Geography_20240101_120000.csv");
    let bytes = b"question_number,question\n1,\"Capital, please\"\n";
    std::fs::write(&file, bytes).unwrap();

    quizgen(dir.path())
        .args(["download", "--file"])
        .arg(&file)
        .args(["--dest", "downloads"])
        .assert()
        .success()
        .stdout(predicate::str::contains("text/csv"));

    let copied = dir
        .path()
        .join("downloads/quiz_results_Geography_20240101_120000.csv");
    assert_eq!(std::fs::read(copied).unwrap(), bytes);
}

#[test]
fn download_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    quizgen(dir.path())
        .args(["download", "--file", "results/nope.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn missing_api_key_fails_fast() {
    let dir = TempDir::new().unwrap();

    quizgen(dir.path())
        .args(["quiz", "--topic", "Geography"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GROQ_API_KEY"));
}

#[test]
fn invalid_count_is_rejected() {
    let dir = mock_workspace(CAPITAL_MCQ);

    quizgen(dir.path())
        .args(["quiz", "--topic", "Geography", "--count", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question count must be between 1 and 50"));
}

#[test]
fn unparseable_replies_exhaust_attempts() {
    let dir = mock_workspace("I cannot help with that.");

    quizgen(dir.path())
        .args(["generate", "--topic", "Geography", "--count", "1", "--out", "s.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("after 3 attempt(s)"));

    assert!(!dir.path().join("s.json").exists());
}

#[test]
fn unknown_format_is_rejected_before_generation() {
    let dir = mock_workspace(CAPITAL_MCQ);

    quizgen(dir.path())
        .args(["quiz", "--topic", "Geography", "--count", "1", "--format", "xml"])
        .write_stdin("3\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'xml'"));

    assert!(!dir.path().join("results").exists());
}

#[test]
fn html_format_saves_only_html() {
    let dir = mock_workspace(CAPITAL_MCQ);

    quizgen(dir.path())
        .args(["quiz", "--topic", "Geography", "--count", "1", "--format", "html"])
        .write_stdin("3\n")
        .assert()
        .success();

    let files = files_in(&dir.path().join("results"));
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].extension().unwrap(), "html");
}

#[test]
fn unknown_provider() {
    let dir = mock_workspace(CAPITAL_MCQ);

    quizgen(dir.path())
        .args(["quiz", "--topic", "Geography", "--provider", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("provider 'nope' not found"));
}

#[test]
fn explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();

    quizgen(dir.path())
        .args(["list-models", "--config", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn list_models_from_mock_config() {
    let dir = mock_workspace(CAPITAL_MCQ);

    quizgen(dir.path())
        .arg("list-models")
        .assert()
        .success()
        .stdout(predicate::str::contains("Provider: offline (default)"))
        .stdout(predicate::str::contains("mock-model"))
        .stdout(predicate::str::contains("groq (skipped"));
}
