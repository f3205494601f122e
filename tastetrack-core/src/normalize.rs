//! Flattening heterogeneous ingredient and step entries into display strings.
//!
//! Models return ingredients and steps either as plain strings or as records
//! with whatever field names they felt like using. Each record field is probed
//! through an ordered alias list; when nothing resolves, the record is kept as
//! its JSON text so no content is dropped.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const QUANTITY_KEYS: &[&str] = &["quantity", "qty", "amount"];
const NAME_KEYS: &[&str] = &["name", "ingredient", "item"];
const NOTE_KEYS: &[&str] = &["description", "note"];

const ACTION_KEYS: &[&str] = &["action", "title", "instruction"];
const DETAIL_KEYS: &[&str] = &["description", "text", "details"];

/// One ingredient or step entry as the model emitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawEntry {
    Text(String),
    Record(Map<String, Value>),
    Other(Value),
}

impl From<&str> for RawEntry {
    fn from(s: &str) -> Self {
        RawEntry::Text(s.to_string())
    }
}

impl From<Value> for RawEntry {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => RawEntry::Text(s),
            Value::Object(map) => RawEntry::Record(map),
            other => RawEntry::Other(other),
        }
    }
}

/// Render an ingredient entry as "quantity name (note)".
pub fn normalize_ingredient(entry: &RawEntry) -> String {
    match entry {
        RawEntry::Text(s) => s.clone(),
        RawEntry::Record(record) => {
            let quantity = probe(record, QUANTITY_KEYS);
            let name = probe(record, NAME_KEYS);
            let note = probe(record, NOTE_KEYS);

            let text = [quantity, name]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");

            let text = match note {
                Some(note) if text.is_empty() => note,
                Some(note) => format!("{} ({})", text, note),
                None => text,
            };

            if text.is_empty() {
                raw_text(record)
            } else {
                text
            }
        }
        RawEntry::Other(value) => value_to_text(value),
    }
}

/// Render a step entry as "Action. details".
pub fn normalize_step(entry: &RawEntry) -> String {
    match entry {
        RawEntry::Text(s) => s.clone(),
        RawEntry::Record(record) => {
            let action = probe(record, ACTION_KEYS);
            let details = probe(record, DETAIL_KEYS);

            let text = match (action, details) {
                (Some(action), Some(details)) => {
                    format!("{}. {}", action.trim_end_matches('.'), details)
                }
                (Some(action), None) => action,
                (None, Some(details)) => details,
                (None, None) => String::new(),
            };

            if text.is_empty() {
                raw_text(record)
            } else {
                text
            }
        }
        RawEntry::Other(value) => value_to_text(value),
    }
}

static STEP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:\s*step\s*\d+\s*:\s*)+").expect("valid regex"));

/// Strip any number of leading "Step N:" prefixes and trim.
///
/// Idempotent: the prefix group is greedy, so nothing prefix-like survives.
pub fn clean_step_text(step: &str) -> String {
    STEP_PREFIX.replace(step, "").trim().to_string()
}

/// Normalize then clean a step entry.
pub fn canonical_step(entry: &RawEntry) -> String {
    clean_step_text(&normalize_step(entry))
}

/// First alias whose value is present and non-empty.
fn probe(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(present_text)
}

fn present_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => (n.as_f64() != Some(0.0)).then(|| n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(items) if !items.is_empty() => Some(value.to_string()),
        Value::Object(map) if !map.is_empty() => Some(value.to_string()),
        _ => None,
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn raw_text(record: &Map<String, Value>) -> String {
    Value::Object(record.clone()).to_string()
}
