//! Built-in checks.
//!
//! Every built-in check is a [`Check`] value. [`Rule`](crate::Rule) exposes a
//! named method per check (`required()`, `max_length(3)`, ...) which builds
//! the corresponding variant and runs it through [`Rule::check`](crate::Rule::check).
//!
//! ## Shared protocol
//!
//! A check reads the rule's value. Empty values (see
//! [`is_empty`](crate::utils::is_empty)) are skipped by every check except
//! [`Check::Required`]; absence is only a failure when it is explicitly
//! required. Otherwise the check's predicate runs and a failure produces the
//! check's template, formatted with its parameters.
//!
//! | Check | Fails when | Template |
//! |---|---|---|
//! | `Required` | value is empty | `required` |
//! | `Float` | no numeric prefix | `float` |
//! | `Integer` | leading integer differs from the numeric value | `integer` |
//! | `Numeric(..)` | not numeric (`number`) or bound not satisfied | `lessThan`, `between`, ... |
//! | `Size(n)` | list length differs | `size` |
//! | `Length(..)` | character count out of bounds | `length`, `minLength`, ... |
//! | `In` / `NotIn` | (not) one of the options | `in` / `notIn` |
//! | `Match(v)` | value differs from `v` | `match` |
//! | `Pattern(..)` | regex does not match | `regex`, `digit`, `email`, `url` |

mod length;
mod numeric;
mod pattern;
mod values;

pub use length::LengthAssertion;
pub use numeric::NumericAssertion;
pub use pattern::{Pattern, PatternCheck};

use crate::error::Result;
use crate::templates::{keys, Templates};
use crate::utils::is_empty;
use crate::value::Value;

/// A built-in check.
#[derive(Debug, Clone)]
pub enum Check {
    /// The value must not be empty
    Required,
    /// The value must start with a number
    Float,
    /// The value must be an integer
    Integer,
    /// The value must be numeric and satisfy the assertion
    Numeric(NumericAssertion),
    /// A list value must have exactly this many items
    Size(usize),
    /// The string form must satisfy the length assertion
    Length(LengthAssertion),
    /// The value must be one of the options
    In(Vec<Value>),
    /// The value must not be one of the options
    NotIn(Vec<Value>),
    /// The value must equal the given value
    Match(Value),
    /// The string form must match the pattern
    Pattern(PatternCheck),
}

impl Check {
    /// Name of the check, which is also the key of its main template.
    pub fn name(&self) -> &'static str {
        match self {
            Check::Required => keys::REQUIRED,
            Check::Float => keys::FLOAT,
            Check::Integer => keys::INTEGER,
            Check::Numeric(assertion) => assertion.template_key(),
            Check::Size(_) => keys::SIZE,
            Check::Length(assertion) => assertion.template_key(),
            Check::In(_) => keys::IN,
            Check::NotIn(_) => keys::NOT_IN,
            Check::Match(_) => keys::MATCH,
            Check::Pattern(pattern) => pattern.template_key(),
        }
    }

    /// Returns true if empty values pass this check without evaluation.
    pub fn skips_empty(&self) -> bool {
        !matches!(self, Check::Required)
    }

    /// Evaluates the check, returning the failure message if it fails.
    ///
    /// Empty values are skipped according to [`skips_empty`](Self::skips_empty).
    ///
    /// # Errors
    ///
    /// Only a regex source that does not compile is an error.
    pub fn evaluate(&self, value: &Value, templates: &Templates) -> Result<Option<String>> {
        if self.skips_empty() && is_empty(value) {
            return Ok(None);
        }

        let failure = match self {
            Check::Required if is_empty(value) => Some(templates.get(keys::REQUIRED).to_string()),
            Check::Required => None,
            Check::Float => numeric::check_float(value, templates),
            Check::Integer => numeric::check_integer(value, templates),
            Check::Numeric(assertion) => assertion.evaluate(value, templates),
            Check::Size(size) => length::check_size(*size, value, templates),
            Check::Length(assertion) => assertion.evaluate(value, templates),
            Check::In(options) => values::check_in(options, value, templates),
            Check::NotIn(options) => values::check_not_in(options, value, templates),
            Check::Match(expected) => values::check_match(expected, value, templates),
            Check::Pattern(pattern) => pattern.evaluate(value, templates)?,
        };
        Ok(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_skip_all_but_required() {
        let templates = Templates::default();
        let checks = vec![
            Check::Float,
            Check::Integer,
            Check::Numeric(NumericAssertion::LessThan(1.0)),
            Check::Size(3),
            Check::Length(LengthAssertion::Min(3)),
            Check::In(vec![]),
            Check::NotIn(vec![]),
            Check::Match(Value::from("x")),
            Check::Pattern(PatternCheck::Email),
        ];

        for empty in [
            Value::Absent,
            Value::from(""),
            Value::from("  "),
            Value::List(vec![]),
        ] {
            for check in &checks {
                assert_eq!(
                    check.evaluate(&empty, &templates).unwrap(),
                    None,
                    "{} should skip {empty:?}",
                    check.name()
                );
            }
            assert_eq!(
                Check::Required
                    .evaluate(&empty, &templates)
                    .unwrap()
                    .as_deref(),
                Some("Required.")
            );
        }
    }

    #[test]
    fn test_names_match_template_keys() {
        assert_eq!(Check::Required.name(), "required");
        assert_eq!(
            Check::Numeric(NumericAssertion::GreaterThanOrEqualTo(1.0)).name(),
            "greaterThanOrEqualTo"
        );
        assert_eq!(
            Check::Length(LengthAssertion::Between(1, 2)).name(),
            "lengthBetween"
        );
        assert_eq!(Check::NotIn(vec![]).name(), "notIn");
        assert_eq!(Check::Pattern(PatternCheck::Url).name(), "url");
    }

    #[test]
    fn test_zero_is_validated_not_skipped() {
        let templates = Templates::default();
        let result = Check::Numeric(NumericAssertion::GreaterThan(0.0))
            .evaluate(&Value::from(0), &templates)
            .unwrap();
        assert_eq!(result.as_deref(), Some("Must be greater than 0."));
    }
}
