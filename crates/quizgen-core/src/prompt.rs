//! Prompt construction for question generation.

use crate::model::{Difficulty, QuestionKind, BLANK_MARKER};

/// Default system prompt for question generation.
pub const SYSTEM_PROMPT: &str = "You are a quiz author. Respond ONLY with a single JSON object \
matching the requested fields. Do not add explanations or any text outside the JSON.";

/// Build the user prompt asking for one question of `kind` about `topic`.
pub fn question_prompt(topic: &str, difficulty: Difficulty, kind: QuestionKind) -> String {
    match kind {
        QuestionKind::MultipleChoice => format!(
            "Generate a {difficulty} multiple-choice question about {topic}.\n\n\
             Return ONLY a JSON object with these exact fields:\n\
             - \"question\": a clear, specific question\n\
             - \"options\": an array of exactly 4 distinct possible answers\n\
             - \"correct_answer\": the option that is correct, copied exactly\n\n\
             Example:\n\
             {{\"question\": \"What is the capital of France?\", \
             \"options\": [\"London\", \"Berlin\", \"Paris\", \"Madrid\"], \
             \"correct_answer\": \"Paris\"}}"
        ),
        QuestionKind::FillInBlank => format!(
            "Generate a {difficulty} fill-in-the-blank question about {topic}.\n\n\
             Return ONLY a JSON object with these exact fields:\n\
             - \"question\": a sentence with {BLANK_MARKER} marking the blank\n\
             - \"answer\": the word or phrase that belongs in the blank\n\n\
             Example:\n\
             {{\"question\": \"The capital of France is {BLANK_MARKER}.\", \"answer\": \"Paris\"}}"
        ),
    }
}
