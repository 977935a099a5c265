use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizgen_core::generator::parse_question;
use quizgen_core::model::*;

const MCQ_REPLY: &str = r#"Sure, here is a question:

```json
{
    "question": "Which keyword moves ownership into a closure?",
    "options": ["ref", "move", "mut", "static"],
    "correct_answer": "move"
}
```"#;

const BLANK_REPLY: &str =
    r#"{"question": "A value can have only one ___ at a time.", "answer": "owner"}"#;

fn make_mcq(i: usize) -> Question {
    Question::MultipleChoice(
        MultipleChoice::new(
            format!("Question {i}?"),
            vec!["alpha".into(), "beta".into(), "gamma".into(), "delta".into()],
            "gamma",
        )
        .unwrap(),
    )
}

fn make_blank(i: usize) -> Question {
    Question::FillInBlank(FillInBlank::new(format!("Blank {i} is _____."), "Answer").unwrap())
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    // A maximum-size quiz of each kind, half answered correctly.
    let mcqs: Vec<(Question, Answer)> = (0..50)
        .map(|i| {
            let pick = if i % 2 == 0 { "gamma" } else { "beta" };
            (make_mcq(i), Answer::select(["alpha", pick]))
        })
        .collect();
    let blanks: Vec<(Question, Answer)> = (0..50)
        .map(|i| {
            let text = if i % 2 == 0 { "  answer " } else { "wrong" };
            (make_blank(i), Answer::text(text))
        })
        .collect();

    group.bench_function("mcq_x50", |b| {
        b.iter(|| {
            let results: Vec<_> = mcqs
                .iter()
                .enumerate()
                .map(|(i, (q, a))| q.evaluate(i, black_box(a)))
                .collect();
            Score::from_results(&results)
        })
    });

    group.bench_function("fill_in_blank_x50", |b| {
        b.iter(|| {
            let results: Vec<_> = blanks
                .iter()
                .enumerate()
                .map(|(i, (q, a))| q.evaluate(i, black_box(a)))
                .collect();
            Score::from_results(&results)
        })
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_question");

    group.bench_function("fenced_mcq", |b| {
        b.iter(|| parse_question(black_box(MCQ_REPLY), QuestionKind::MultipleChoice))
    });

    group.bench_function("bare_blank_with_repair", |b| {
        b.iter(|| parse_question(black_box(BLANK_REPLY), QuestionKind::FillInBlank))
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_parse);
criterion_main!(benches);
