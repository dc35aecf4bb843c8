//! Inbound trigger payloads.

use crate::{
    error::DispatchError,
    value::{Value, Values, shape_of},
};
use std::fmt;

/// A structured value that can present itself as a string-keyed mapping.
pub trait StructValue: Send + Sync {
    /// Converts the value into a mapping.
    fn to_map(&self) -> Values;
}

/// The payload a trigger hands to a handler.
pub enum TriggerData {
    /// No payload.
    Empty,
    /// A string-keyed mapping, used as-is.
    Values(Values),
    /// A structured value, converted through [`StructValue::to_map`].
    Struct(Box<dyn StructValue>),
    /// Anything else. Rejected by [`TriggerData::into_values`].
    Other(Value),
}

impl TriggerData {
    /// Wraps a structured value.
    pub fn from_struct(value: impl StructValue + 'static) -> Self {
        TriggerData::Struct(Box::new(value))
    }

    /// Normalizes the payload into a mapping.
    ///
    /// An empty payload yields an empty mapping; unsupported shapes fail with
    /// [`DispatchError::UnsupportedTriggerData`].
    pub fn into_values(self) -> Result<Values, DispatchError> {
        match self {
            TriggerData::Empty => Ok(Values::new()),
            TriggerData::Values(values) => Ok(values),
            TriggerData::Struct(value) => Ok(value.to_map()),
            TriggerData::Other(value) => Err(DispatchError::UnsupportedTriggerData(format!(
                "{} {value}",
                shape_of(&value)
            ))),
        }
    }
}

impl From<Value> for TriggerData {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => TriggerData::Empty,
            Value::Object(values) => TriggerData::Values(values),
            other => TriggerData::Other(other),
        }
    }
}

impl From<Values> for TriggerData {
    fn from(values: Values) -> Self {
        TriggerData::Values(values)
    }
}

impl From<Option<Values>> for TriggerData {
    fn from(values: Option<Values>) -> Self {
        values.map_or(TriggerData::Empty, TriggerData::Values)
    }
}

impl From<()> for TriggerData {
    fn from((): ()) -> Self {
        TriggerData::Empty
    }
}

impl fmt::Debug for TriggerData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerData::Empty => f.write_str("Empty"),
            TriggerData::Values(v) => f.debug_tuple("Values").field(v).finish(),
            TriggerData::Struct(_) => f.write_str("Struct(..)"),
            TriggerData::Other(v) => f.debug_tuple("Other").field(v).finish(),
        }
    }
}
