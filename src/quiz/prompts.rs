use schemars::{schema_for, JsonSchema};

use super::model::{Difficulty, Question};
use crate::core::Prompt;

const QUESTION_PERSONA: &str = "You are APPtitude, an intelligent math teacher. \
Generate a mental math question suitable for the given difficulty level (1-5).";

const JUDGE_PERSONA: &str = "You are APPtitude, an intelligent math teacher evaluating student answers.";

/// Prompt asking the backend for one question as a JSON object.
pub fn question_prompt<T: JsonSchema>(difficulty: Difficulty, topic: &str) -> Prompt {
    let user = format!(
        "Generate a mental math question about {topic} for difficulty level {level} \
         (1=easiest, 5=hardest). Level {level} means {descriptor}. \
         The answer must be a single number without units. \
         Return ONLY a JSON object with the following format: \
         {{\"question\": \"question text\", \"answer\": \"numerical answer\", \"explanation\": \"step-by-step solution\"}}",
        level = difficulty.get(),
        descriptor = difficulty.descriptor(),
    );
    Prompt::new(QUESTION_PERSONA, add_schema_guidance::<T>(user))
}

/// Prompt asking the backend to judge an answer with a bare `true`/`false`.
pub fn verdict_prompt(question: &Question, user_answer: &str) -> Prompt {
    let user = format!(
        "Question: {}\nCorrect answer: {}\nStudent's answer: {}\n\n\
         Decide whether the student's answer is equivalent to the correct answer. \
         Ignore formatting differences such as currency symbols, units, thousands separators or trailing zeros. \
         Reply with exactly one word: true or false.",
        question.text(),
        question.correct_answer(),
        user_answer.trim(),
    );
    Prompt::new(JUDGE_PERSONA, user)
}

fn add_schema_guidance<T: JsonSchema>(prompt: String) -> String {
    let schema = schema_for!(T);
    let schema_json =
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "Schema serialization failed".to_string());
    format!(
        "{}\n\n## Response Format\nThe JSON object must match this schema:\n```json\n{}\n```",
        prompt, schema_json
    )
}
