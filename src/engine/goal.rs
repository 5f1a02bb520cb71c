use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A goal or observed value for a single step.
///
/// The value space is a closed set of variants rather than an open any-type.
/// Equality is the natural equality of each variant, and values of different
/// variants never compare equal, so a textual reading can never accidentally
/// satisfy a numeric goal.
///
/// Untagged (de)serialization lets JSON scalars map straight onto variants:
/// `65` becomes `Number(65.0)`, `"PRINTING"` becomes `Text`, `true` becomes
/// `Bool`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GoalValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl GoalValue {
    /// Parse a raw response body into a goal value.
    ///
    /// The body is tried as a JSON scalar first, so `65`, `"PRINTING"` and
    /// `true` all land on the matching variant. Anything else (plain text,
    /// JSON objects, arrays) falls back to the trimmed raw text, which is what
    /// device endpoints that return `text/plain` status strings produce.
    pub fn parse(body: &str) -> Self {
        let trimmed = body.trim();
        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Bool(b)) => GoalValue::Bool(b),
            Ok(Value::Number(n)) => match n.as_f64() {
                Some(f) => GoalValue::Number(f),
                None => GoalValue::Text(trimmed.to_string()),
            },
            Ok(Value::String(s)) => GoalValue::Text(s),
            _ => GoalValue::Text(trimmed.to_string()),
        }
    }
}

impl PartialEq for GoalValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (GoalValue::Bool(a), GoalValue::Bool(b)) => a == b,
            (GoalValue::Number(a), GoalValue::Number(b)) => a == b,
            (GoalValue::Text(a), GoalValue::Text(b)) => a == b,
            // Cross-variant comparisons are always unequal
            _ => false,
        }
    }
}

impl fmt::Display for GoalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalValue::Bool(b) => write!(f, "{b}"),
            GoalValue::Number(n) => write!(f, "{n}"),
            GoalValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for GoalValue {
    fn from(b: bool) -> Self {
        GoalValue::Bool(b)
    }
}

impl From<f64> for GoalValue {
    fn from(n: f64) -> Self {
        GoalValue::Number(n)
    }
}

impl From<i32> for GoalValue {
    fn from(n: i32) -> Self {
        GoalValue::Number(n as f64)
    }
}

impl From<i64> for GoalValue {
    fn from(n: i64) -> Self {
        GoalValue::Number(n as f64)
    }
}

impl From<u32> for GoalValue {
    fn from(n: u32) -> Self {
        GoalValue::Number(n as f64)
    }
}

impl From<&str> for GoalValue {
    fn from(s: &str) -> Self {
        GoalValue::Text(s.to_string())
    }
}

impl From<String> for GoalValue {
    fn from(s: String) -> Self {
        GoalValue::Text(s)
    }
}
