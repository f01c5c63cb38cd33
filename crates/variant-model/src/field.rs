//! Shape-tolerant descriptor fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A descriptor value that either has the expected shape or was kept as-is.
///
/// Loading never fails because a single field has the wrong primitive type;
/// the offending value is preserved as [`RawField::Malformed`] so validation
/// can report every such field in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField<T> {
    Value(T),
    Malformed(Value),
}

impl<T> RawField<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            RawField::Value(v) => Some(v),
            RawField::Malformed(_) => None,
        }
    }

    /// A short rendering of the value for error messages.
    pub fn describe(&self) -> String
    where
        T: Serialize,
    {
        let rendered = match self {
            RawField::Value(v) => serde_json::to_value(v).unwrap_or(Value::Null),
            RawField::Malformed(v) => v.clone(),
        };
        describe_value(&rendered)
    }
}

impl<T> From<T> for RawField<T> {
    fn from(value: T) -> Self {
        RawField::Value(value)
    }
}

/// Render a JSON value as `type value`, e.g. `string "abc"` or `table`.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string \"{s}\""),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "table".to_string(),
    }
}
