//! Core data model types for quizgen.
//!
//! Questions are validated on construction and immutable afterwards;
//! deserialization runs through the same constructors, so a question loaded
//! from a session file satisfies the same invariants as a freshly generated one.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Marks where a fill-in-the-blank answer belongs.
pub const BLANK_MARKER: &str = "_____";

/// Number of options on every multiple-choice question.
pub const OPTION_COUNT: usize = 4;

/// Shown for a multiple-choice question with nothing selected.
pub const NO_SELECTION: &str = "No selection";

/// Shown for a fill-in-the-blank question left empty.
pub const NO_ANSWER: &str = "No answer provided";

/// Difficulty level, used to word the generation prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// The two supported question formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    FillInBlank,
}

impl QuestionKind {
    /// Label used in exported result files.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "MCQ",
            QuestionKind::FillInBlank => "Fill in the Blank",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::MultipleChoice => write!(f, "multiple-choice"),
            QuestionKind::FillInBlank => write!(f, "fill-in-blank"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mcq" | "multiple-choice" | "multiple_choice" | "multiplechoice" => {
                Ok(QuestionKind::MultipleChoice)
            }
            "fill" | "blank" | "fill-in-blank" | "fill_in_blank" | "fill-in-the-blank" => {
                Ok(QuestionKind::FillInBlank)
            }
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// A question with exactly four distinct options, one of which is correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMultipleChoice", into = "RawMultipleChoice")]
pub struct MultipleChoice {
    prompt: String,
    options: Vec<String>,
    correct_answer: String,
}

#[derive(Serialize, Deserialize)]
struct RawMultipleChoice {
    prompt: String,
    options: Vec<String>,
    correct_answer: String,
}

impl MultipleChoice {
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let prompt = prompt.into();
        let correct_answer = correct_answer.into();

        if prompt.trim().is_empty() {
            return Err(ValidationError::EmptyField("question"));
        }
        if options.len() != OPTION_COUNT {
            return Err(ValidationError::WrongOptionCount(options.len()));
        }
        let mut seen = BTreeSet::new();
        for option in &options {
            if option.trim().is_empty() {
                return Err(ValidationError::EmptyField("option"));
            }
            if !seen.insert(option.as_str()) {
                return Err(ValidationError::DuplicateOption(option.clone()));
            }
        }
        if correct_answer.trim().is_empty() {
            return Err(ValidationError::EmptyField("correct_answer"));
        }
        if !options.contains(&correct_answer) {
            return Err(ValidationError::CorrectAnswerNotInOptions(correct_answer));
        }

        Ok(Self {
            prompt,
            options,
            correct_answer,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }
}

impl TryFrom<RawMultipleChoice> for MultipleChoice {
    type Error = ValidationError;

    fn try_from(raw: RawMultipleChoice) -> Result<Self, Self::Error> {
        MultipleChoice::new(raw.prompt, raw.options, raw.correct_answer)
    }
}

impl From<MultipleChoice> for RawMultipleChoice {
    fn from(q: MultipleChoice) -> Self {
        Self {
            prompt: q.prompt,
            options: q.options,
            correct_answer: q.correct_answer,
        }
    }
}

/// A sentence containing [`BLANK_MARKER`] and the word or phrase that fills it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFillInBlank", into = "RawFillInBlank")]
pub struct FillInBlank {
    prompt: String,
    answer: String,
}

#[derive(Serialize, Deserialize)]
struct RawFillInBlank {
    prompt: String,
    answer: String,
}

impl FillInBlank {
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Result<Self, ValidationError> {
        let prompt = prompt.into();
        let answer = answer.into();

        if prompt.trim().is_empty() {
            return Err(ValidationError::EmptyField("question"));
        }
        if answer.trim().is_empty() {
            return Err(ValidationError::EmptyField("answer"));
        }
        if !prompt.contains(BLANK_MARKER) {
            return Err(ValidationError::MissingBlankMarker);
        }

        Ok(Self { prompt, answer })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

impl TryFrom<RawFillInBlank> for FillInBlank {
    type Error = ValidationError;

    fn try_from(raw: RawFillInBlank) -> Result<Self, Self::Error> {
        FillInBlank::new(raw.prompt, raw.answer)
    }
}

impl From<FillInBlank> for RawFillInBlank {
    fn from(q: FillInBlank) -> Self {
        Self {
            prompt: q.prompt,
            answer: q.answer,
        }
    }
}

/// A generated quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Question {
    MultipleChoice(MultipleChoice),
    FillInBlank(FillInBlank),
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::MultipleChoice(_) => QuestionKind::MultipleChoice,
            Question::FillInBlank(_) => QuestionKind::FillInBlank,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Question::MultipleChoice(q) => q.prompt(),
            Question::FillInBlank(q) => q.prompt(),
        }
    }

    pub fn correct_answer(&self) -> &str {
        match self {
            Question::MultipleChoice(q) => q.correct_answer(),
            Question::FillInBlank(q) => q.answer(),
        }
    }

    /// The answer options; empty for fill-in-the-blank questions.
    pub fn options(&self) -> &[String] {
        match self {
            Question::MultipleChoice(q) => q.options(),
            Question::FillInBlank(_) => &[],
        }
    }

    /// An unanswered placeholder of the right shape for this question.
    pub fn blank_answer(&self) -> Answer {
        match self {
            Question::MultipleChoice(_) => Answer::MultipleChoice(BTreeSet::new()),
            Question::FillInBlank(_) => Answer::FillInBlank(String::new()),
        }
    }

    /// Score `answer` against this question.
    ///
    /// A multiple-choice answer is correct when the correct option is among
    /// the selections, even if other options are selected too. A fill-in
    /// answer is compared after trimming and lowercasing both sides.
    pub fn evaluate(&self, index: usize, answer: &Answer) -> EvaluatedResult {
        let (user_answer, is_correct) = match (self, answer) {
            (Question::MultipleChoice(q), Answer::MultipleChoice(selected)) => {
                let display = display_selection(q.options(), selected);
                (display, selected.contains(q.correct_answer()))
            }
            (Question::FillInBlank(q), Answer::FillInBlank(text)) if !text.trim().is_empty() => {
                let is_correct = normalize(text) == normalize(q.answer());
                (text.clone(), is_correct)
            }
            (Question::MultipleChoice(_), _) => (NO_SELECTION.to_string(), false),
            (Question::FillInBlank(_), _) => (NO_ANSWER.to_string(), false),
        };

        EvaluatedResult {
            index,
            prompt: self.prompt().to_string(),
            kind: self.kind(),
            options: self.options().to_vec(),
            user_answer,
            correct_answer: self.correct_answer().to_string(),
            is_correct,
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Selected options joined in the order the question lists them.
fn display_selection(options: &[String], selected: &BTreeSet<String>) -> String {
    if selected.is_empty() {
        return NO_SELECTION.to_string();
    }
    let mut ordered: Vec<&str> = options
        .iter()
        .filter(|o| selected.contains(o.as_str()))
        .map(String::as_str)
        .collect();
    // Selections that aren't options at all go last.
    ordered.extend(
        selected
            .iter()
            .filter(|s| !options.contains(s))
            .map(String::as_str),
    );
    ordered.join(", ")
}

// ---------------------------------------------------------------------------
// Answers and results
// ---------------------------------------------------------------------------

/// A user's answer, shaped like the question it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Answer {
    /// The set of selected option strings.
    MultipleChoice(BTreeSet<String>),
    /// Free text, possibly empty.
    FillInBlank(String),
}

impl Answer {
    /// A multiple-choice answer selecting `options`.
    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::MultipleChoice(options.into_iter().map(Into::into).collect())
    }

    /// A fill-in-the-blank answer.
    pub fn text(text: impl Into<String>) -> Self {
        Answer::FillInBlank(text.into())
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Answer::MultipleChoice(_) => QuestionKind::MultipleChoice,
            Answer::FillInBlank(_) => QuestionKind::FillInBlank,
        }
    }
}

/// The outcome of scoring one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedResult {
    /// Zero-based position of the question in the quiz.
    pub index: usize,
    pub prompt: String,
    pub kind: QuestionKind,
    /// Options offered; empty for fill-in-the-blank.
    #[serde(default)]
    pub options: Vec<String>,
    /// What the user answered, formatted for display.
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

impl EvaluatedResult {
    /// One-based question number.
    pub fn question_number(&self) -> usize {
        self.index + 1
    }
}

/// Aggregate score over a set of evaluated results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    /// `100 * correct / total`.
    pub percentage: f64,
}

impl Score {
    /// Compute the score, or `None` when there is nothing to score.
    pub fn from_results(results: &[EvaluatedResult]) -> Option<Self> {
        let total = results.len();
        if total == 0 {
            return None;
        }
        let correct = results.iter().filter(|r| r.is_correct).count();
        Some(Self {
            correct,
            total,
            percentage: 100.0 * correct as f64 / total as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capital_mcq() -> Question {
        Question::MultipleChoice(
            MultipleChoice::new(
                "What is the capital of France?",
                vec!["London".into(), "Berlin".into(), "Paris".into(), "Madrid".into()],
                "Paris",
            )
            .unwrap(),
        )
    }

    fn capital_blank() -> Question {
        Question::FillInBlank(FillInBlank::new("The capital of France is _____.", "paris").unwrap())
    }

    #[test]
    fn kind_and_difficulty_parse() {
        assert_eq!("MCQ".parse::<QuestionKind>().unwrap(), QuestionKind::MultipleChoice);
        assert_eq!("fill".parse::<QuestionKind>().unwrap(), QuestionKind::FillInBlank);
        assert!("essay".parse::<QuestionKind>().is_err());
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn multiple_choice_requires_four_options() {
        let err = MultipleChoice::new("Q?", vec!["a".into(), "b".into(), "c".into()], "a")
            .unwrap_err();
        assert_eq!(err, ValidationError::WrongOptionCount(3));
    }

    #[test]
    fn multiple_choice_rejects_duplicates_and_foreign_answer() {
        let dup = MultipleChoice::new(
            "Q?",
            vec!["a".into(), "b".into(), "a".into(), "d".into()],
            "a",
        );
        assert_eq!(dup.unwrap_err(), ValidationError::DuplicateOption("a".into()));

        let foreign = MultipleChoice::new(
            "Q?",
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            "e",
        );
        assert_eq!(
            foreign.unwrap_err(),
            ValidationError::CorrectAnswerNotInOptions("e".into())
        );
    }

    #[test]
    fn fill_in_blank_requires_marker() {
        assert_eq!(
            FillInBlank::new("The capital of France is Paris.", "Paris").unwrap_err(),
            ValidationError::MissingBlankMarker
        );
        assert_eq!(
            FillInBlank::new("The capital is _____.", "  ").unwrap_err(),
            ValidationError::EmptyField("answer")
        );
    }

    #[test]
    fn deserialization_enforces_invariants() {
        let json = r#"{"type":"multiple-choice","prompt":"Q?","options":["a","b"],"correct_answer":"a"}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());

        let json = r#"{"type":"fill-in-blank","prompt":"The sky is _____.","answer":"blue"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind(), QuestionKind::FillInBlank);
        assert_eq!(q.correct_answer(), "blue");
    }

    #[test]
    fn mcq_correct_when_answer_among_selections() {
        let q = capital_mcq();
        let result = q.evaluate(0, &Answer::select(["Madrid", "Paris"]));
        assert!(result.is_correct);
        // Displayed in option order, not selection order.
        assert_eq!(result.user_answer, "Paris, Madrid");
        assert_eq!(result.correct_answer, "Paris");
        assert_eq!(result.options.len(), 4);
    }

    #[test]
    fn mcq_empty_selection_is_incorrect() {
        let q = capital_mcq();
        let result = q.evaluate(2, &q.blank_answer());
        assert!(!result.is_correct);
        assert_eq!(result.user_answer, NO_SELECTION);
        assert_eq!(result.question_number(), 3);
    }

    #[test]
    fn fill_in_blank_ignores_case_and_whitespace() {
        let q = capital_blank();
        let result = q.evaluate(0, &Answer::text(" Paris "));
        assert!(result.is_correct);
        assert_eq!(result.user_answer, " Paris ");

        let wrong = q.evaluate(0, &Answer::text("Lyon"));
        assert!(!wrong.is_correct);
    }

    #[test]
    fn fill_in_blank_empty_answer_uses_sentinel() {
        let q = capital_blank();
        let result = q.evaluate(0, &Answer::text("   "));
        assert!(!result.is_correct);
        assert_eq!(result.user_answer, NO_ANSWER);
        assert!(result.options.is_empty());
    }

    #[test]
    fn score_percentage() {
        let q = capital_blank();
        let results: Vec<_> = ["paris", "paris", "paris", "rome", ""]
            .iter()
            .enumerate()
            .map(|(i, a)| q.evaluate(i, &Answer::text(*a)))
            .collect();
        let score = Score::from_results(&results).unwrap();
        assert_eq!((score.correct, score.total), (3, 5));
        assert!((score.percentage - 60.0).abs() < f64::EPSILON);
        assert!(Score::from_results(&[]).is_none());
    }
}
