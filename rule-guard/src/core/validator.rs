//! Static entry points that start a new rule.

use crate::core::message::CustomOutcome;
use crate::core::rule::Rule;
use crate::value::Value;
use std::collections::HashMap;

/// Shorthand constructors for [`Rule`].
///
/// Every call builds a fresh rule, so nothing carries over between
/// validation passes.
///
/// ```rust
/// use rule_guard::Validator;
///
/// let mut rule = Validator::value("12");
/// rule.integer().unwrap().less_than(10.0).unwrap();
/// assert_eq!(rule.resolved_messages(), vec!["Must be less than 10."]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// A new rule with the default templates.
    pub fn rule() -> Rule {
        Rule::new()
    }

    /// A new rule with template overrides merged over the defaults.
    pub fn with_templates(overrides: &HashMap<String, String>) -> Rule {
        Rule::with_templates(overrides)
    }

    /// A new rule bound to `field`.
    pub fn field(field: impl Into<String>) -> Rule {
        let mut rule = Rule::new();
        rule.field(field);
        rule
    }

    /// A new rule with `value` under test.
    pub fn value(value: impl Into<Value>) -> Rule {
        let mut rule = Rule::new();
        rule.value(value);
        rule
    }

    /// A new rule with one custom check already applied.
    pub fn custom<F, O>(callback: F) -> Rule
    where
        F: FnOnce() -> O,
        O: Into<CustomOutcome>,
    {
        let mut rule = Rule::new();
        rule.custom(callback);
        rule
    }
}
