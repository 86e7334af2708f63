//! Message templates.
//!
//! Each check looks up its failure message by name. Templates may contain
//! numbered placeholders that are filled with [`utils::format`](crate::utils::format).
//!
//! A single process-wide default set is shared by every [`Rule`](crate::Rule)
//! built without overrides. It is meant to be configured once at startup via
//! [`extend_templates`]; changing it while rules are being evaluated only
//! affects rules constructed afterwards.

use crate::value::Value;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Template names used by the built-in checks.
pub mod keys {
    pub const ERROR: &str = "error";
    pub const REQUIRED: &str = "required";
    pub const FLOAT: &str = "float";
    pub const INTEGER: &str = "integer";
    pub const NUMBER: &str = "number";
    pub const LESS_THAN: &str = "lessThan";
    pub const LESS_THAN_OR_EQUAL_TO: &str = "lessThanOrEqualTo";
    pub const GREATER_THAN: &str = "greaterThan";
    pub const GREATER_THAN_OR_EQUAL_TO: &str = "greaterThanOrEqualTo";
    pub const BETWEEN: &str = "between";
    pub const SIZE: &str = "size";
    pub const LENGTH: &str = "length";
    pub const MIN_LENGTH: &str = "minLength";
    pub const MAX_LENGTH: &str = "maxLength";
    pub const LENGTH_BETWEEN: &str = "lengthBetween";
    pub const IN: &str = "in";
    pub const NOT_IN: &str = "notIn";
    pub const MATCH: &str = "match";
    pub const REGEX: &str = "regex";
    pub const DIGIT: &str = "digit";
    pub const EMAIL: &str = "email";
    pub const URL: &str = "url";
    pub const UNIQUE: &str = "unique";
}

const DEFAULTS: &[(&str, &str)] = &[
    (keys::ERROR, "Error."),
    (keys::REQUIRED, "Required."),
    (keys::FLOAT, "Must be a number."),
    (keys::INTEGER, "Must be an integer."),
    (keys::NUMBER, "Must be a number."),
    (keys::LESS_THAN, "Must be less than {0}."),
    (keys::LESS_THAN_OR_EQUAL_TO, "Must be less than or equal to {0}."),
    (keys::GREATER_THAN, "Must be greater than {0}."),
    (keys::GREATER_THAN_OR_EQUAL_TO, "Must be greater than or equal to {0}."),
    (keys::BETWEEN, "Must be between {0} and {1}."),
    (keys::SIZE, "Size must be {0}."),
    (keys::LENGTH, "Length must be {0}."),
    (keys::MIN_LENGTH, "Must have at least {0} characters."),
    (keys::MAX_LENGTH, "Must have up to {0} characters."),
    (keys::LENGTH_BETWEEN, "Must have between {0} and {1} characters."),
    (keys::IN, "Must be {0}."),
    (keys::NOT_IN, "Must not be {0}."),
    (keys::MATCH, "Not matched."),
    (keys::REGEX, "Invalid format."),
    (keys::DIGIT, "Must be a digit."),
    (keys::EMAIL, "Invalid email."),
    (keys::URL, "Invalid url."),
    (keys::UNIQUE, "Already taken."),
];

/// Joins the options of an `in`/`notIn` check into display text.
pub type OptionCombiner = Arc<dyn Fn(&[Value]) -> String + Send + Sync>;

/// The default option combiner: `"a"`, `"a or b"`, `"a, b or c"`.
pub fn default_option_combiner(options: &[Value]) -> String {
    let rendered: Vec<String> = options.iter().map(Value::to_text).collect();
    match rendered.split_last() {
        Some((last, rest)) if rest.len() > 1 => format!("{} or {}", rest.join(", "), last),
        _ => rendered.join(" or "),
    }
}

/// A mapping from check name to message template.
#[derive(Clone)]
pub struct Templates {
    entries: HashMap<String, String>,
    option_combiner: OptionCombiner,
}

impl fmt::Debug for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Templates")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            entries: DEFAULTS
                .iter()
                .map(|(key, template)| (key.to_string(), template.to_string()))
                .collect(),
            option_combiner: Arc::new(default_option_combiner),
        }
    }
}

impl Templates {
    /// Returns the template for `key`.
    ///
    /// Unknown keys yield the key itself, so a missing template is visible in
    /// the output instead of producing a blank message.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map_or(key, String::as_str)
    }

    /// Returns true if a template is defined for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Sets a single template.
    pub fn with_template(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.entries.insert(key.into(), template.into());
        self
    }

    /// Replaces the option combiner used by `in`/`notIn` messages.
    pub fn with_option_combiner<F>(mut self, combiner: F) -> Self
    where
        F: Fn(&[Value]) -> String + Send + Sync + 'static,
    {
        self.option_combiner = Arc::new(combiner);
        self
    }

    /// Joins options with the configured combiner.
    pub fn combine_options(&self, options: &[Value]) -> String {
        (self.option_combiner)(options)
    }

    /// Returns a copy with `overrides` merged on top, key by key.
    ///
    /// Overrides win; keys they do not mention keep this set's template.
    pub fn merged(&self, overrides: &HashMap<String, String>) -> Templates {
        let mut merged = self.clone();
        merged.extend(overrides);
        merged
    }

    fn extend(&mut self, overrides: &HashMap<String, String>) {
        for (key, template) in overrides {
            self.entries.insert(key.clone(), template.clone());
        }
    }

    /// Iterates over `(key, template)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, template)| (key.as_str(), template.as_str()))
    }
}

static DEFAULT_TEMPLATES: Lazy<RwLock<Arc<Templates>>> =
    Lazy::new(|| RwLock::new(Arc::new(Templates::default())));

/// Returns the process-wide default templates.
///
/// The returned `Arc` is shared, not copied.
pub fn default_templates() -> Arc<Templates> {
    Arc::clone(
        &DEFAULT_TEMPLATES
            .read()
            .unwrap_or_else(PoisonError::into_inner),
    )
}

/// Merges `overrides` into the process-wide default templates.
pub fn extend_templates(overrides: &HashMap<String, String>) {
    let mut defaults = DEFAULT_TEMPLATES
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    let mut updated = Templates::clone(&defaults);
    updated.extend(overrides);
    *defaults = Arc::new(updated);
    tracing::debug!(count = overrides.len(), "Extended default templates");
}

/// Replaces the option combiner of the process-wide default templates.
pub fn set_option_combiner<F>(combiner: F)
where
    F: Fn(&[Value]) -> String + Send + Sync + 'static,
{
    let mut defaults = DEFAULT_TEMPLATES
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *defaults = Arc::new(Templates::clone(&defaults).with_option_combiner(combiner));
}
