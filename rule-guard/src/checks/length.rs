//! String length checks.
//!
//! Lengths are measured in characters of the value's string form, so a
//! number such as `12345` has length 5.

use crate::templates::{keys, Templates};
use crate::utils::format;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Types of length assertions that can be made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthAssertion {
    /// String must be exactly this length
    Exactly(usize),
    /// String must be at least this length
    Min(usize),
    /// String must be at most this length
    Max(usize),
    /// String length must be between min and max (inclusive)
    Between(usize, usize),
}

impl LengthAssertion {
    /// Evaluates the assertion against a length.
    pub fn holds(&self, length: usize) -> bool {
        match *self {
            LengthAssertion::Exactly(expected) => length == expected,
            LengthAssertion::Min(min) => length >= min,
            LengthAssertion::Max(max) => length <= max,
            LengthAssertion::Between(min, max) => length >= min && length <= max,
        }
    }

    /// Name of the template used when the assertion fails.
    pub fn template_key(&self) -> &'static str {
        match self {
            LengthAssertion::Exactly(_) => keys::LENGTH,
            LengthAssertion::Min(_) => keys::MIN_LENGTH,
            LengthAssertion::Max(_) => keys::MAX_LENGTH,
            LengthAssertion::Between(_, _) => keys::LENGTH_BETWEEN,
        }
    }

    /// Renders the failure message with the bound(s) filled in.
    pub fn message(&self, templates: &Templates) -> String {
        let template = templates.get(self.template_key());
        match *self {
            LengthAssertion::Exactly(n) | LengthAssertion::Min(n) | LengthAssertion::Max(n) => {
                format(template, &[n])
            }
            LengthAssertion::Between(min, max) => format(template, &[min, max]),
        }
    }

    pub(crate) fn evaluate(&self, value: &Value, templates: &Templates) -> Option<String> {
        let length = value.to_text().chars().count();
        (!self.holds(length)).then(|| self.message(templates))
    }
}

impl fmt::Display for LengthAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthAssertion::Exactly(len) => write!(f, "exactly {len} characters"),
            LengthAssertion::Min(min) => write!(f, "at least {min} characters"),
            LengthAssertion::Max(max) => write!(f, "at most {max} characters"),
            LengthAssertion::Between(min, max) => write!(f, "between {min} and {max} characters"),
        }
    }
}

/// Fails when a list value does not have exactly `size` items.
///
/// Non-list values always pass.
pub(crate) fn check_size(size: usize, value: &Value, templates: &Templates) -> Option<String> {
    match value {
        Value::List(items) if items.len() != size => {
            Some(format(templates.get(keys::SIZE), &[size]))
        }
        _ => None,
    }
}
