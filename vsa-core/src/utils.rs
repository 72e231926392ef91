use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::consts::DEFAULT_ARTIFACT_EXT;

///
/// JSON value kinds as the reporter's contract distinguishes them. Integers
/// and floats are separate kinds: a count written as `3.0` is not an integer,
/// and a flag written as `1` is not a boolean.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonKind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonKind::Null,
            Value::Bool(_) => JsonKind::Boolean,
            Value::Number(n) if is_integral(n) => JsonKind::Integer,
            Value::Number(_) => JsonKind::Float,
            Value::String(_) => JsonKind::String,
            Value::Array(_) => JsonKind::Array,
            Value::Object(_) => JsonKind::Object,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, JsonKind::Integer | JsonKind::Float)
    }
}

impl Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonKind::Null => "null",
            JsonKind::Boolean => "boolean",
            JsonKind::Integer => "integer",
            JsonKind::Float => "float",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        };
        write!(f, "{}", name)
    }
}

fn is_integral(n: &Number) -> bool {
    n.is_i64() || n.is_u64()
}

///
/// Numeric equality with the semantics of the golden documents: two integers
/// compare exactly, anything involving a float compares as `f64`, so `12345`
/// equals `12345.0`. Non-numbers are never equal here.
///
pub fn numbers_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if is_integral(x) && is_integral(y) {
                x == y
            } else {
                match (x.as_f64(), y.as_f64()) {
                    (Some(x), Some(y)) => x == y,
                    _ => false,
                }
            }
        }
        _ => false,
    }
}

///
/// File name of the golden/observed document for a dataset identifier.
///
pub fn artifact_file_name(dataset_id: &str) -> String {
    format!("{}.{}", dataset_id, DEFAULT_ARTIFACT_EXT)
}
