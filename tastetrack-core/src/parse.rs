//! Locating JSON inside free-text model responses.
//!
//! Models wrap their JSON in prose, markdown fences or trailing commentary.
//! The scanner walks every opening bracket of the requested shape, finds the
//! balanced span it starts (ignoring brackets inside JSON strings) and returns
//! the first span that parses.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FormatError;

/// Top-level JSON shape a caller expects from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedShape {
    Array,
    Object,
}

impl ExpectedShape {
    fn opener(self) -> char {
        match self {
            ExpectedShape::Array => '[',
            ExpectedShape::Object => '{',
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            ExpectedShape::Array => value.is_array(),
            ExpectedShape::Object => value.is_object(),
        }
    }
}

impl fmt::Display for ExpectedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedShape::Array => f.write_str("array"),
            ExpectedShape::Object => f.write_str("object"),
        }
    }
}

/// Extract the first balanced span of `shape` from `text` that parses as JSON.
pub fn extract_json(text: &str, shape: ExpectedShape) -> Result<Value, FormatError> {
    let opener = shape.opener();
    let mut last_error = None;
    let mut unclosed = HashSet::new();

    for (start, c) in text.char_indices() {
        if c != opener || unclosed.contains(&start) {
            continue;
        }
        let scan = balanced_end(text, start);
        unclosed.extend(scan.unclosed);
        let Some(end) = scan.end else {
            continue;
        };
        match serde_json::from_str::<Value>(&text[start..end]) {
            Ok(value) if shape.matches(&value) => return Ok(value),
            Ok(_) => {}
            Err(e) => last_error = Some(e.to_string()),
        }
    }

    Err(match last_error {
        Some(message) => FormatError::InvalidJson { shape, message },
        None => FormatError::NoSpan(shape),
    })
}

struct Scan {
    /// Byte offset just past the bracket closing the one at `start`.
    end: Option<usize>,
    /// Openers still open when a failed scan stopped. A scan starting at any
    /// of them sees the same brackets and fails too.
    unclosed: Vec<usize>,
}

/// Scan forward from the bracket at `start` to its matching closer.
fn balanced_end(text: &str, start: usize) -> Scan {
    let mut closers: Vec<(char, usize)> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' => closers.push((']', start + offset)),
            '{' => closers.push(('}', start + offset)),
            ']' | '}' => {
                if closers.last().map(|(closer, _)| *closer) != Some(c) {
                    break;
                }
                closers.pop();
                if closers.is_empty() {
                    return Scan {
                        end: Some(start + offset + c.len_utf8()),
                        unclosed: Vec::new(),
                    };
                }
            }
            _ => {}
        }
    }

    Scan {
        end: None,
        unclosed: closers.into_iter().map(|(_, position)| position).collect(),
    }
}
