use serde_json::Value;
use thiserror::Error;

use crate::errors::PipelineError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("response text is empty")]
    Empty,

    #[error("{0}")]
    Malformed(String),
}

impl From<ParseFailure> for PipelineError {
    fn from(failure: ParseFailure) -> Self {
        match failure {
            ParseFailure::Empty => PipelineError::EmptyResponse,
            ParseFailure::Malformed(reason) => PipelineError::Parse(reason),
        }
    }
}

/// Extract the ingredient list from free-form model output.
///
/// Every `[` is tried in order as the start of a JSON array. The matching
/// `]` is found by depth counting that skips over string literals, so
/// brackets inside ingredient names and later bracketed regions do not
/// extend the candidate. The first candidate that parses as JSON decides
/// the outcome.
pub fn parse_ingredient_list(text: &str) -> Result<Vec<String>, ParseFailure> {
    if text.trim().is_empty() {
        return Err(ParseFailure::Empty);
    }

    for (start, _) in text.match_indices('[') {
        let Some(end) = find_array_end(text, start) else {
            continue;
        };

        let candidate = &text[start..=end];
        let value: Value = match serde_json::from_str(candidate) {
            Ok(v) => v,
            Err(e) => {
                log::debug!("Skipping bracketed region at byte {}: {}", start, e);
                continue;
            }
        };

        return into_string_list(value);
    }

    Err(ParseFailure::Malformed(format!(
        "no JSON array found in response: {}",
        preview(text)
    )))
}

/// Byte index of the `]` closing the array opened at `start`, if balanced.
fn find_array_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

fn into_string_list(value: Value) -> Result<Vec<String>, ParseFailure> {
    let Value::Array(items) = value else {
        return Err(ParseFailure::Malformed("expected a JSON array".to_string()));
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(ParseFailure::Malformed(format!(
                "expected a list of strings, found element {}",
                other
            ))),
        })
        .collect()
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 200;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
