//! Numeric checks: `float`, `integer` and the bound comparisons.

use crate::templates::{keys, Templates};
use crate::utils::{format, parse_float, parse_int, to_number};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A bound the numeric value must satisfy.
///
/// ```rust
/// use rule_guard::checks::NumericAssertion;
///
/// assert!(NumericAssertion::LessThan(10.0).holds(9.5));
/// assert!(!NumericAssertion::LessThan(10.0).holds(10.0));
/// assert!(NumericAssertion::Between(1.0, 3.0).holds(3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NumericAssertion {
    /// Value must be strictly less than the bound
    LessThan(f64),
    /// Value must be less than or equal to the bound
    LessThanOrEqualTo(f64),
    /// Value must be strictly greater than the bound
    GreaterThan(f64),
    /// Value must be greater than or equal to the bound
    GreaterThanOrEqualTo(f64),
    /// Value must lie in the inclusive range
    Between(f64, f64),
}

impl NumericAssertion {
    /// Evaluates the assertion against a parsed number.
    pub fn holds(&self, number: f64) -> bool {
        match self {
            NumericAssertion::LessThan(bound) => number < *bound,
            NumericAssertion::LessThanOrEqualTo(bound) => number <= *bound,
            NumericAssertion::GreaterThan(bound) => number > *bound,
            NumericAssertion::GreaterThanOrEqualTo(bound) => number >= *bound,
            NumericAssertion::Between(low, high) => number >= *low && number <= *high,
        }
    }

    /// Name of the template used when the assertion fails.
    pub fn template_key(&self) -> &'static str {
        match self {
            NumericAssertion::LessThan(_) => keys::LESS_THAN,
            NumericAssertion::LessThanOrEqualTo(_) => keys::LESS_THAN_OR_EQUAL_TO,
            NumericAssertion::GreaterThan(_) => keys::GREATER_THAN,
            NumericAssertion::GreaterThanOrEqualTo(_) => keys::GREATER_THAN_OR_EQUAL_TO,
            NumericAssertion::Between(_, _) => keys::BETWEEN,
        }
    }

    fn bounds(&self) -> Vec<Value> {
        match *self {
            NumericAssertion::LessThan(bound)
            | NumericAssertion::LessThanOrEqualTo(bound)
            | NumericAssertion::GreaterThan(bound)
            | NumericAssertion::GreaterThanOrEqualTo(bound) => vec![Value::Number(bound)],
            NumericAssertion::Between(low, high) => {
                vec![Value::Number(low), Value::Number(high)]
            }
        }
    }

    /// Renders the failure message with the bound(s) filled in.
    pub fn message(&self, templates: &Templates) -> String {
        format(templates.get(self.template_key()), &self.bounds())
    }

    /// Checks a field value: non-numeric input yields the `number` message.
    pub(crate) fn evaluate(&self, value: &Value, templates: &Templates) -> Option<String> {
        match parse_float(&value.to_text()) {
            None => Some(templates.get(keys::NUMBER).to_string()),
            Some(number) if !self.holds(number) => Some(self.message(templates)),
            Some(_) => None,
        }
    }
}

impl fmt::Display for NumericAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericAssertion::LessThan(v) => write!(f, "less than {v}"),
            NumericAssertion::LessThanOrEqualTo(v) => write!(f, "less than or equal to {v}"),
            NumericAssertion::GreaterThan(v) => write!(f, "greater than {v}"),
            NumericAssertion::GreaterThanOrEqualTo(v) => {
                write!(f, "greater than or equal to {v}")
            }
            NumericAssertion::Between(low, high) => write!(f, "between {low} and {high}"),
        }
    }
}

/// Fails when the text has no numeric prefix.
pub(crate) fn check_float(value: &Value, templates: &Templates) -> Option<String> {
    parse_float(&value.to_text())
        .is_none()
        .then(|| templates.get(keys::FLOAT).to_string())
}

/// Fails when the leading integer differs from the whole-value number.
///
/// `"2.9"` fails (2 != 2.9) but `"2.0"` passes because both sides compare
/// as the number 2. Values with trailing text such as `"2px"` fail because
/// the whole value is not numeric.
pub(crate) fn check_integer(value: &Value, templates: &Templates) -> Option<String> {
    let integral = match parse_int(&value.to_text()) {
        None => false,
        Some(number) => number == to_number(value),
    };
    (!integral).then(|| templates.get(keys::INTEGER).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> Templates {
        Templates::default()
    }

    #[test]
    fn test_holds() {
        assert!(NumericAssertion::LessThanOrEqualTo(5.0).holds(5.0));
        assert!(!NumericAssertion::GreaterThan(5.0).holds(5.0));
        assert!(NumericAssertion::GreaterThanOrEqualTo(5.0).holds(5.0));
        assert!(!NumericAssertion::Between(1.0, 2.0).holds(2.5));
    }

    #[test]
    fn test_evaluate_non_numeric_uses_number_template() {
        let result = NumericAssertion::LessThan(3.0).evaluate(&Value::from("abc"), &templates());
        assert_eq!(result.as_deref(), Some("Must be a number."));
    }

    #[test]
    fn test_evaluate_messages_include_bounds() {
        let t = templates();
        assert_eq!(
            NumericAssertion::LessThan(3.0)
                .evaluate(&Value::from("3"), &t)
                .as_deref(),
            Some("Must be less than 3.")
        );
        assert_eq!(
            NumericAssertion::Between(1.5, 2.0)
                .evaluate(&Value::from(7), &t)
                .as_deref(),
            Some("Must be between 1.5 and 2.")
        );
        assert_eq!(
            NumericAssertion::GreaterThan(0.0).evaluate(&Value::from("12kg"), &t),
            None
        );
    }

    #[test]
    fn test_float() {
        let t = templates();
        assert_eq!(check_float(&Value::from("1.5"), &t), None);
        assert_eq!(check_float(&Value::from("12abc"), &t), None);
        assert_eq!(
            check_float(&Value::from("abc"), &t).as_deref(),
            Some("Must be a number.")
        );
    }

    #[test]
    fn test_integer() {
        let t = templates();
        assert_eq!(check_integer(&Value::from("2"), &t), None);
        assert_eq!(check_integer(&Value::from(-7), &t), None);
        assert!(check_integer(&Value::from("2.9"), &t).is_some());
        assert!(check_integer(&Value::from(2.9), &t).is_some());
        assert!(check_integer(&Value::from("2px"), &t).is_some());
        assert!(check_integer(&Value::from("abc"), &t).is_some());
    }

    #[test]
    fn test_integer_accepts_integral_decimal_notation() {
        // "2.0" parses to the integer 2 and converts to the number 2.0,
        // which compare equal, so it is accepted as an integer.
        assert_eq!(check_integer(&Value::from("2.0"), &templates()), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(NumericAssertion::LessThan(10.0).to_string(), "less than 10");
        assert_eq!(
            NumericAssertion::Between(1.0, 2.5).to_string(),
            "between 1 and 2.5"
        );
    }
}
