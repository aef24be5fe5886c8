//! Answer values
//!
//! Submissions arrive as arbitrary JSON. Each answer is narrowed into one of
//! a fixed set of shapes at the boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A single submitted answer
///
/// Lists keep their raw elements: a multi-select containing a non-string
/// element must be rejected by the validator, while the aggregator skips
/// such elements, so both need to see them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum AnswerValue {
    /// Explicit null
    Null,
    /// Text
    String(String),
    /// Any JSON number
    Number(f64),
    /// Boolean
    Bool(bool),
    /// JSON array, elements untouched
    List(Vec<Value>),
    /// Objects and anything else
    Other(Value),
}

impl AnswerValue {
    /// Returns the string if this is a string answer
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnswerValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a numeric answer
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// True for null, the empty string and the empty list
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Null => true,
            AnswerValue::String(s) => s.is_empty(),
            AnswerValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Iterates the string elements of a list answer
    pub fn string_items(&self) -> impl Iterator<Item = &str> {
        let items: &[Value] = match self {
            AnswerValue::List(items) => items,
            _ => &[],
        };
        items.iter().filter_map(Value::as_str)
    }

    /// Value equality against a JSON literal.
    ///
    /// Numbers compare numerically, so `1` matches `1.0`.
    pub fn matches(&self, expected: &Value) -> bool {
        match (self, expected) {
            (AnswerValue::Null, Value::Null) => true,
            (AnswerValue::String(a), Value::String(b)) => a == b,
            (AnswerValue::Number(a), Value::Number(b)) => b.as_f64() == Some(*a),
            (AnswerValue::Bool(a), Value::Bool(b)) => a == b,
            (AnswerValue::List(a), Value::Array(b)) => a == b,
            (AnswerValue::Other(a), b) => a == b,
            _ => false,
        }
    }
}

impl From<Value> for AnswerValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AnswerValue::Null,
            Value::String(s) => AnswerValue::String(s),
            Value::Number(n) => match n.as_f64() {
                Some(f) => AnswerValue::Number(f),
                None => AnswerValue::Other(Value::Number(n)),
            },
            Value::Bool(b) => AnswerValue::Bool(b),
            Value::Array(items) => AnswerValue::List(items),
            other @ Value::Object(_) => AnswerValue::Other(other),
        }
    }
}

impl From<AnswerValue> for Value {
    fn from(answer: AnswerValue) -> Self {
        match answer {
            AnswerValue::Null => Value::Null,
            AnswerValue::String(s) => Value::String(s),
            AnswerValue::Number(f) => number_value(f),
            AnswerValue::Bool(b) => Value::Bool(b),
            AnswerValue::List(items) => Value::Array(items),
            AnswerValue::Other(v) => v,
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        AnswerValue::String(s.to_string())
    }
}

impl From<f64> for AnswerValue {
    fn from(n: f64) -> Self {
        AnswerValue::Number(n)
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        AnswerValue::Bool(b)
    }
}

/// Whole numbers are written back as integers
fn number_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        return Value::from(f as i64);
    }
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}
