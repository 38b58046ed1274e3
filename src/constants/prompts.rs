use once_cell::sync::Lazy;
use schemars::JsonSchema;

use crate::constants::{NOT_ANSWERED, OPTIONS_PER_QUESTION};
use crate::models::domain::QuizItem;

/// Shape the model is asked to emit for each question. Only used to render
/// the schema embedded in the generation prompt.
#[derive(JsonSchema)]
#[allow(dead_code)]
struct GeneratedQuestion {
    question: String,
    options: [String; OPTIONS_PER_QUESTION],
    #[schemars(range(min = 0, max = 3))]
    answer: u8,
}

static QUESTION_ARRAY_SCHEMA: Lazy<String> = Lazy::new(|| {
    let schema = schemars::schema_for!(Vec<GeneratedQuestion>);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
});

const QUESTION_EXAMPLE: &str = r#"[
  {
    "question": "Question text?",
    "options": ["optA","optB","optC","optD"],
    "answer": 0
  },
  ...
]"#;

pub fn question_generation_prompt(topic: &str, count: usize) -> String {
    format!(
        "You are a helpful assistant. Generate exactly {count} multiple-choice questions (MCQs) about the topic \"{topic}\".

Return ONLY a valid JSON array (no explanatory text). The JSON must look like:
{QUESTION_EXAMPLE}

It must validate against this JSON schema:
{schema}

Requirements:
- Provide exactly {count} objects.
- Each \"options\" must be an array of {OPTIONS_PER_QUESTION} strings.
- \"answer\" must be an integer index 0..3 (the correct option).
- Do NOT include any additional fields or text outside the JSON array.",
        schema = QUESTION_ARRAY_SCHEMA.as_str(),
    )
}

pub fn feedback_prompt(topic: &str, items: &[QuizItem]) -> String {
    let correct = items.iter().filter(|item| item.is_correct()).count();
    let summary: String = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "{}. {}\n   Chosen: {}\n   Correct: {}\n   Result: {}\n",
                i + 1,
                item.question,
                item.chosen_option().unwrap_or(NOT_ANSWERED),
                item.correct_option().unwrap_or("unknown"),
                if item.is_correct() { "correct" } else { "incorrect" },
            )
        })
        .collect();

    format!(
        "You are a supportive tutor. A learner just finished a multiple-choice quiz about the topic \"{topic}\" and scored {correct}/{total}.

Here are the questions with the learner's answers and the correct answers:
{summary}
Write concise, encouraging feedback in plain prose (no JSON, no headings). Mention what the learner did well, name the specific concepts they should revisit based on the incorrect or unanswered questions, and suggest one or two next steps for studying \"{topic}\".",
        total = items.len(),
    )
}
