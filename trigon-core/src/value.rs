//! Runtime value model.

use serde::{Deserialize, Serialize};
use std::fmt;

pub use serde_json::Value;

/// An ordered string-keyed mapping of runtime values.
///
/// Insertion order is preserved, so scopes and mapper outputs iterate in the
/// order their entries were declared.
pub type Values = serde_json::Map<String, Value>;

/// The declared type of an action input or output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Accepts any value unchanged.
    #[default]
    Any,
    /// A string.
    String,
    /// A signed integer.
    #[serde(alias = "int")]
    Integer,
    /// A floating point number.
    #[serde(alias = "number")]
    Float,
    /// A boolean.
    #[serde(alias = "bool")]
    Boolean,
    /// A string-keyed object.
    Object,
    /// An array.
    Array,
}

impl ValueType {
    /// The lowercase name used in action metadata.
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::Any => "any",
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::Boolean => "boolean",
            ValueType::Object => "object",
            ValueType::Array => "array",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Names the JSON shape of a value, for error messages.
pub fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
