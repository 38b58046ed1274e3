//! Turns untrusted model output into quiz items.
//!
//! Decoding tries each strategy in [`DECODE_STRATEGIES`] in order and stops at
//! the first one that yields a JSON value. A fenced block only counts when it
//! holds an array, so prose around it can still be searched. Only the outer
//! shape is strict:
//! once an array is found, every element is repaired into a valid
//! [`QuizItem`] rather than rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::constants::{OPTIONS_PER_QUESTION, UNTITLED_QUESTION};
use crate::models::domain::QuizItem;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizParseError {
    #[error("non-JSON output")]
    NonJson,

    #[error("not an array")]
    NotAnArray,
}

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)```").expect("FENCED_BLOCK is a valid regex pattern")
});

static BRACKETED_ARRAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[.*\]").expect("BRACKETED_ARRAY is a valid regex pattern"));

type DecodeStrategy = fn(&str) -> Option<Value>;

const DECODE_STRATEGIES: &[(&str, DecodeStrategy)] = &[
    ("direct", decode_direct),
    ("code fence", decode_fenced),
    ("bracketed array", decode_bracketed),
];

fn decode_direct(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

fn decode_fenced(raw: &str) -> Option<Value> {
    let body = FENCED_BLOCK.captures(raw)?.get(1)?.as_str();
    serde_json::from_str(body).ok().filter(Value::is_array)
}

/// First `[` through the last `]`.
fn decode_bracketed(raw: &str) -> Option<Value> {
    let candidate = BRACKETED_ARRAY.find(raw)?.as_str();
    serde_json::from_str(candidate).ok()
}

pub fn decode_json(raw: &str) -> Result<Value, QuizParseError> {
    DECODE_STRATEGIES
        .iter()
        .find_map(|(name, decode)| {
            let value = decode(raw)?;
            log::debug!("Decoded model output with {} strategy", name);
            Some(value)
        })
        .ok_or(QuizParseError::NonJson)
}

/// Parses at most `expected_count` items. Fewer elements in the source are
/// returned as-is, never padded.
pub fn parse_quiz_items(
    raw: &str,
    expected_count: usize,
) -> Result<Vec<QuizItem>, QuizParseError> {
    let Value::Array(elements) = decode_json(raw)? else {
        return Err(QuizParseError::NotAnArray);
    };

    Ok(elements
        .iter()
        .take(expected_count)
        .map(normalize_item)
        .collect())
}

pub fn normalize_item(value: &Value) -> QuizItem {
    let question = value
        .get("question")
        .map(coerce_to_string)
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| UNTITLED_QUESTION.to_string());

    let options: [String; OPTIONS_PER_QUESTION] = match value.get("options") {
        Some(Value::Array(source)) => {
            std::array::from_fn(|i| source.get(i).map(coerce_to_string).unwrap_or_default())
        }
        _ => Default::default(),
    };

    QuizItem::new(question, options, option_index(value.get("answer")).unwrap_or(0))
}

/// Normalizes an item sent back by the browser. A `chosenAnswer` survives only
/// when it names one of the options.
pub fn normalize_answered_item(value: &Value) -> QuizItem {
    let mut item = normalize_item(value);
    item.chosen_answer = option_index(value.get("chosenAnswer"));
    item
}

fn option_index(value: Option<&Value>) -> Option<usize> {
    value
        .and_then(Value::as_f64)
        .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n < OPTIONS_PER_QUESTION as f64)
        .map(|n| n as usize)
}

fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
