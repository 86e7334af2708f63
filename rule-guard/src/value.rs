//! The value under validation.
//!
//! [`Value`] is a tagged union over the shapes a form field can carry. Checks
//! pattern-match on it explicitly; the few places that need the loose
//! string/number coercions of form input go through [`Value::to_text`] and
//! the helpers in [`crate::utils`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered key/value parameters, used for maps and remote-check query params.
pub type Params = IndexMap<String, Value>;

/// A field value.
///
/// `Absent` is an explicit "no value" (a null). It is distinct from a rule
/// whose value was never set, which is a programming error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Explicitly no value
    #[default]
    Absent,
    /// Boolean flag
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
    /// Ordered sequence of values
    List(Vec<Value>),
    /// Keyed container
    Map(Params),
}

impl Value {
    /// Returns the string form of the value, as it would be rendered into a
    /// text input.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Short type name used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

/// Renders a number the way form inputs display it: integral values without
/// a fractional part, `Infinity` rather than `inf`, no negative zero, and
/// exponent notation (`1e+21`, `1e-7`) outside `[1e-6, 1e21)`.
pub(crate) fn fmt_number(number: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if number.is_nan() {
        return write!(f, "NaN");
    }
    if number.is_infinite() {
        let sign = if number > 0.0 { "" } else { "-" };
        return write!(f, "{sign}Infinity");
    }
    if number == 0.0 {
        return f.write_str("0");
    }

    let magnitude = number.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let rendered = format!("{number:e}");
        match rendered.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                write!(f, "{mantissa}e+{exponent}")
            }
            _ => f.write_str(&rendered),
        }
    } else {
        write!(f, "{number}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => Ok(()),
            Value::Bool(flag) => write!(f, "{flag}"),
            Value::Number(number) => fmt_number(*number, f),
            Value::Text(text) => f.write_str(text),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Map(_) => f.write_str("[object Object]"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(f64::from(value))
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Absent, Into::into)
    }
}

impl From<Params> for Value {
    fn from(map: Params) -> Self {
        Value::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Absent,
            serde_json::Value::Bool(flag) => Value::Bool(flag),
            serde_json::Value::Number(number) => {
                Value::Number(number.as_f64().unwrap_or(f64::NAN))
            }
            serde_json::Value::String(text) => Value::Text(text),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_numbers() {
        assert_eq!(Value::from(2.0).to_text(), "2");
        assert_eq!(Value::from(2.5).to_text(), "2.5");
        assert_eq!(Value::from(-3).to_text(), "-3");
        assert_eq!(Value::Number(f64::INFINITY).to_text(), "Infinity");
        assert_eq!(Value::Number(f64::NAN).to_text(), "NaN");
    }

    #[test]
    fn test_display_number_edges() {
        assert_eq!(Value::from(-0.0).to_text(), "0");
        assert_eq!(Value::from(0.0).to_text(), "0");
        assert_eq!(Value::from(1e21).to_text(), "1e+21");
        assert_eq!(Value::from(-1.5e22).to_text(), "-1.5e+22");
        assert_eq!(Value::from(1e-7).to_text(), "1e-7");
        assert_eq!(Value::from(1e20).to_text(), "100000000000000000000");
        assert_eq!(Value::from(0.000001).to_text(), "0.000001");
    }

    #[test]
    fn test_display_containers() {
        assert_eq!(Value::from(vec![1, 2, 3]).to_text(), "1,2,3");
        assert_eq!(Value::List(vec![]).to_text(), "");
        assert_eq!(Value::Map(Params::new()).to_text(), "[object Object]");
        assert_eq!(Value::Absent.to_text(), "");
    }

    #[test]
    fn test_kind() {
        assert_eq!(Value::Absent.kind(), "absent");
        assert_eq!(Value::from(vec![1]).kind(), "list");
        assert_eq!(Value::Map(Params::new()).kind(), "map");
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<&str>), Value::Absent);
        assert_eq!(Value::from(Some("a")), Value::Text("a".to_string()));
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({"name": "x", "tags": ["a", 1], "none": null});
        let value = Value::from(json);
        let Value::Map(map) = value else {
            panic!("expected a map");
        };
        assert_eq!(map["name"], Value::from("x"));
        assert_eq!(
            map["tags"],
            Value::List(vec![Value::from("a"), Value::from(1)])
        );
        assert_eq!(map["none"], Value::Absent);
    }

    #[test]
    fn test_strict_equality_distinguishes_types() {
        assert_ne!(Value::from(1), Value::from("1"));
        assert_eq!(Value::from(1), Value::from(1.0));
    }

    #[test]
    fn test_serde_untagged() {
        let value: Value = serde_json::from_str(r#"[1, "a", true, null]"#).unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::from(1),
                Value::from("a"),
                Value::from(true),
                Value::Absent
            ])
        );
    }
}
