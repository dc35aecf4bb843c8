//! Value coercion.
//!
//! Conversion rules:
//!
//! | target    | accepted                                                        |
//! |-----------|-----------------------------------------------------------------|
//! | `boolean` | bool; null (false); number (non-zero); `true/t/1/yes`, `false/f/0/no/""` |
//! | `integer` | integer; float in `i64` range (truncated); bool (1/0); null (0); numeric string |
//! | `float`   | number; bool (1.0/0.0); null (0.0); numeric string              |
//! | `string`  | string; null (`""`); number/bool (display); array/object (JSON) |
//! | `object`  | object; null (`{}`); JSON object string                         |
//! | `array`   | array; null (`[]`); JSON array string; other scalars (wrapped)  |
//! | `any`     | everything, unchanged                                           |

use crate::{
    error::CoerceError,
    value::{Value, ValueType, Values},
};

/// Converts values to declared field types.
///
/// Injected into a handler so tests and embedders can substitute their own
/// conversion rules.
pub trait Coercer: Send + Sync {
    /// Converts `value` to `target`.
    fn coerce(&self, value: Value, target: ValueType) -> Result<Value, CoerceError>;
}

/// The default [`Coercer`], applying [`to_type`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCoercer;

impl Coercer for StandardCoercer {
    fn coerce(&self, value: Value, target: ValueType) -> Result<Value, CoerceError> {
        to_type(value, target)
    }
}

/// Coerces a value to a boolean.
pub fn to_bool(value: &Value) -> Result<bool, CoerceError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Null => Ok(false),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" | "yes" => Ok(true),
            "false" | "f" | "0" | "no" | "" => Ok(false),
            _ => Err(CoerceError::new(value.clone(), ValueType::Boolean)),
        },
        Value::Array(_) | Value::Object(_) => {
            Err(CoerceError::new(value.clone(), ValueType::Boolean))
        }
    }
}

/// Coerces a value to `target`.
pub fn to_type(value: Value, target: ValueType) -> Result<Value, CoerceError> {
    match target {
        ValueType::Any => Ok(value),
        ValueType::Boolean => to_bool(&value).map(Value::Bool),
        ValueType::Integer => to_integer(value),
        ValueType::Float => to_float(value),
        ValueType::String => Ok(Value::String(to_string(value))),
        ValueType::Object => to_object(value),
        ValueType::Array => to_array(value),
    }
}

fn to_integer(value: Value) -> Result<Value, CoerceError> {
    match value {
        Value::Number(ref n) if n.is_i64() || n.is_u64() => Ok(value),
        Value::Number(ref n) => match n.as_f64().and_then(truncate) {
            Some(i) => Ok(Value::from(i)),
            None => Err(CoerceError::new(value, ValueType::Integer)),
        },
        Value::Bool(b) => Ok(Value::from(i64::from(b))),
        Value::Null => Ok(Value::from(0)),
        Value::String(ref s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Value::from(i));
            }
            if let Ok(u) = s.parse::<u64>() {
                return Ok(Value::from(u));
            }
            match s.parse::<f64>().ok().and_then(truncate) {
                Some(i) => Ok(Value::from(i)),
                None => Err(CoerceError::new(value, ValueType::Integer)),
            }
        }
        Value::Array(_) | Value::Object(_) => Err(CoerceError::new(value, ValueType::Integer)),
    }
}

/// Truncates a float to an integer, refusing values outside the `i64` range.
fn truncate(f: f64) -> Option<i64> {
    let t = f.trunc();
    (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
}

fn to_float(value: Value) -> Result<Value, CoerceError> {
    let f = match &value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Array(_) | Value::Object(_) => None,
    };
    match f {
        Some(f) if f.is_finite() => Ok(Value::from(f)),
        _ => Err(CoerceError::new(value, ValueType::Float)),
    }
}

fn to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn to_object(value: Value) -> Result<Value, CoerceError> {
    match value {
        Value::Object(_) => Ok(value),
        Value::Null => Ok(Value::Object(Values::new())),
        Value::String(ref s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed @ Value::Object(_)) => Ok(parsed),
            _ => Err(CoerceError::new(value, ValueType::Object)),
        },
        _ => Err(CoerceError::new(value, ValueType::Object)),
    }
}

fn to_array(value: Value) -> Result<Value, CoerceError> {
    match value {
        Value::Array(_) => Ok(value),
        Value::Null => Ok(Value::Array(Vec::new())),
        Value::String(ref s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed @ Value::Array(_)) => Ok(parsed),
            _ => Err(CoerceError::new(value, ValueType::Array)),
        },
        Value::Object(_) => Err(CoerceError::new(value, ValueType::Array)),
        scalar => Ok(Value::Array(vec![scalar])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(true), true)]
    #[case(json!(false), false)]
    #[case(json!(null), false)]
    #[case(json!(0), false)]
    #[case(json!(-2), true)]
    #[case(json!(0.5), true)]
    #[case(json!("true"), true)]
    #[case(json!(" TRUE "), true)]
    #[case(json!("t"), true)]
    #[case(json!("1"), true)]
    #[case(json!("yes"), true)]
    #[case(json!("False"), false)]
    #[case(json!("0"), false)]
    #[case(json!(""), false)]
    fn test_to_bool(#[case] input: Value, #[case] expected: bool) {
        assert_eq!(to_bool(&input).unwrap(), expected);
    }

    #[rstest]
    #[case(json!("maybe"))]
    #[case(json!([true]))]
    #[case(json!({"a": true}))]
    fn test_to_bool_rejects(#[case] input: Value) {
        let err = to_bool(&input).unwrap_err();
        assert_eq!(err.target, ValueType::Boolean);
        assert_eq!(err.value, input);
    }

    #[rstest]
    #[case(json!("3"), ValueType::Integer, json!(3))]
    #[case(json!(" 42 "), ValueType::Integer, json!(42))]
    #[case(json!("2.9"), ValueType::Integer, json!(2))]
    #[case(json!(7.8), ValueType::Integer, json!(7))]
    #[case(json!(true), ValueType::Integer, json!(1))]
    #[case(json!(null), ValueType::Integer, json!(0))]
    #[case(json!("18446744073709551615"), ValueType::Integer, json!(u64::MAX))]
    #[case(json!(-9.9), ValueType::Integer, json!(-9))]
    #[case(json!(5), ValueType::Float, json!(5.0))]
    #[case(json!("1.5"), ValueType::Float, json!(1.5))]
    #[case(json!(false), ValueType::Float, json!(0.0))]
    #[case(json!(12), ValueType::String, json!("12"))]
    #[case(json!(true), ValueType::String, json!("true"))]
    #[case(json!(null), ValueType::String, json!(""))]
    #[case(json!({"a": 1}), ValueType::String, json!(r#"{"a":1}"#))]
    #[case(json!("on"), ValueType::Any, json!("on"))]
    #[case(json!("yes"), ValueType::Boolean, json!(true))]
    #[case(json!(r#"{"k": "v"}"#), ValueType::Object, json!({"k": "v"}))]
    #[case(json!(null), ValueType::Object, json!({}))]
    #[case(json!("[1, 2]"), ValueType::Array, json!([1, 2]))]
    #[case(json!(3), ValueType::Array, json!([3]))]
    #[case(json!(null), ValueType::Array, json!([]))]
    fn test_to_type(#[case] input: Value, #[case] target: ValueType, #[case] expected: Value) {
        assert_eq!(to_type(input, target).unwrap(), expected);
    }

    #[rstest]
    #[case(json!("abc"), ValueType::Integer)]
    #[case(json!([1]), ValueType::Integer)]
    #[case(json!("1e20"), ValueType::Integer)]
    #[case(json!(1e20), ValueType::Integer)]
    #[case(json!(-1e20), ValueType::Integer)]
    #[case(json!("18446744073709551616"), ValueType::Integer)]
    #[case(json!("1e999"), ValueType::Float)]
    #[case(json!({"a": 1}), ValueType::Float)]
    #[case(json!("[1]"), ValueType::Object)]
    #[case(json!(4), ValueType::Object)]
    #[case(json!("not json"), ValueType::Array)]
    #[case(json!({"a": 1}), ValueType::Array)]
    fn test_to_type_rejects(#[case] input: Value, #[case] target: ValueType) {
        let err = to_type(input.clone(), target).unwrap_err();
        assert_eq!(err, CoerceError::new(input, target));
    }

    #[test]
    fn test_standard_coercer_delegates() {
        let coerced = StandardCoercer.coerce(json!("8"), ValueType::Integer).unwrap();
        assert_eq!(coerced, json!(8));
    }
}
