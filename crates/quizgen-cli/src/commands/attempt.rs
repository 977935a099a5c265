//! Answering a quiz on the terminal, and printing how it went.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, Table};

use quizgen_core::{Answer, EvaluatedResult, Question, QuizError, QuizSession};

/// Ask every question in `session` and record the replies.
///
/// Multiple-choice replies are comma-separated option numbers (blank for
/// none); fill-in-the-blank replies are free text. End of input leaves the
/// remaining questions unanswered.
pub fn collect_answers<R: BufRead, W: Write>(
    session: &mut QuizSession,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let questions = session.questions().to_vec();
    let total = questions.len();

    for (i, question) in questions.iter().enumerate() {
        writeln!(out, "\nQuestion {}/{}: {}", i + 1, total, question.prompt())?;

        let answer = match question {
            Question::MultipleChoice(_) => {
                for (n, option) in question.options().iter().enumerate() {
                    writeln!(out, "  {}. {}", n + 1, option)?;
                }
                loop {
                    write!(out, "Your answer (comma-separated numbers, blank for none): ")?;
                    out.flush()?;
                    let Some(line) = read_line(input)? else {
                        return Ok(());
                    };
                    match parse_selection(&line, question.options()) {
                        Ok(selected) => break Answer::select(selected),
                        Err(msg) => writeln!(out, "{msg}")?,
                    }
                }
            }
            Question::FillInBlank(_) => {
                write!(out, "Your answer: ")?;
                out.flush()?;
                let Some(line) = read_line(input)? else {
                    return Ok(());
                };
                Answer::text(line.trim_end_matches(['\r', '\n']))
            }
        };

        session.record_answer(i, answer)?;
    }
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read answer")?;
    Ok((read > 0).then_some(line))
}

/// Map `"1, 3"` onto the matching options.
fn parse_selection(line: &str, options: &[String]) -> Result<Vec<String>, String> {
    line.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .ok()
                .filter(|n| (1..=options.len()).contains(n))
                .map(|n| options[n - 1].clone())
                .ok_or_else(|| format!("'{s}' is not an option between 1 and {}", options.len()))
        })
        .collect()
}

/// Evaluate, print the per-question table and the score.
pub fn evaluate_and_report<W: Write>(session: &mut QuizSession, out: &mut W) -> Result<()> {
    let results = session.evaluate();
    if !results.is_empty() {
        writeln!(out, "\n{}", results_table(results))?;
    }

    match session.score() {
        Ok(score) => writeln!(
            out,
            "Score: {}/{} ({:.1}%)",
            score.correct, score.total, score.percentage
        )?,
        Err(QuizError::EmptyResults) => eprintln!("Warning: no results to score."),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn results_table(results: &[EvaluatedResult]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct answer", "Result"]);

    for r in results {
        let verdict = if r.is_correct {
            Cell::new("correct").fg(Color::Green)
        } else {
            Cell::new("wrong").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(r.question_number()),
            Cell::new(&r.prompt),
            Cell::new(&r.user_answer),
            Cell::new(&r.correct_answer),
            verdict,
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        ["Mercury", "Venus", "Earth", "Mars"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn selection_by_numbers() {
        assert_eq!(
            parse_selection("3, 1", &options()).unwrap(),
            vec!["Earth".to_string(), "Mercury".to_string()]
        );
        assert!(parse_selection("", &options()).unwrap().is_empty());
        assert!(parse_selection(" , ", &options()).unwrap().is_empty());
    }

    #[test]
    fn selection_rejects_out_of_range() {
        assert!(parse_selection("5", &options()).is_err());
        assert!(parse_selection("0", &options()).is_err());
        assert!(parse_selection("two", &options()).is_err());
    }
}
