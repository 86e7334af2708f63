//! Runtime registration of named checks.
//!
//! Checks registered here are available on every [`Rule`](crate::Rule) through
//! [`Rule::apply`](crate::Rule::apply). Registration is process-wide and is
//! expected to happen at startup, next to template configuration.
//!
//! ```rust
//! use rule_guard::registry::{add_rule, RegisteredCheck};
//! use rule_guard::{extend_templates, Rule, Value};
//! use std::collections::HashMap;
//!
//! add_rule(
//!     "even",
//!     RegisteredCheck::new("even", |value: &Value, _args: &[Value]| {
//!         rule_guard::utils::to_number(value) % 2.0 == 0.0
//!     }),
//! );
//! extend_templates(&HashMap::from([("even".to_string(), "Must be even.".to_string())]));
//!
//! let mut rule = Rule::new();
//! rule.value(3).apply("even", &[]).unwrap();
//! assert_eq!(rule.resolved_messages(), vec!["Must be even."]);
//! ```

use crate::templates::Templates;
use crate::utils::{format, is_empty};
use crate::value::Value;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// A registered predicate. Returns `true` when the value is valid.
pub type CheckPredicate = Arc<dyn Fn(&Value, &[Value]) -> bool + Send + Sync>;

/// A named check that can be added at runtime.
#[derive(Clone)]
pub struct RegisteredCheck {
    template: String,
    predicate: CheckPredicate,
    skip_empty: bool,
}

impl RegisteredCheck {
    /// Creates a check that reports `template` (formatted with the call's
    /// arguments) when `predicate` returns `false`.
    ///
    /// Like the built-in checks, empty values are skipped.
    pub fn new<F>(template: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> bool + Send + Sync + 'static,
    {
        Self {
            template: template.into(),
            predicate: Arc::new(predicate),
            skip_empty: true,
        }
    }

    /// Also evaluates empty values.
    pub fn run_on_empty(mut self) -> Self {
        self.skip_empty = false;
        self
    }

    /// Name of the template reported on failure.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub(crate) fn evaluate(
        &self,
        value: &Value,
        args: &[Value],
        templates: &Templates,
    ) -> Option<String> {
        if self.skip_empty && is_empty(value) {
            return None;
        }
        (!(self.predicate)(value, args)).then(|| format(templates.get(&self.template), args))
    }
}

impl fmt::Debug for RegisteredCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCheck")
            .field("template", &self.template)
            .field("skip_empty", &self.skip_empty)
            .finish_non_exhaustive()
    }
}

static REGISTRY: Lazy<RwLock<HashMap<String, RegisteredCheck>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers `check` under `name`, replacing any earlier registration.
pub fn add_rule(name: impl Into<String>, check: RegisteredCheck) {
    let name = name.into();
    tracing::debug!(check = %name, template = %check.template, "Registered check");
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name, check);
}

/// Returns true if a check is registered under `name`.
pub fn is_registered(name: &str) -> bool {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(name)
}

pub(crate) fn lookup(name: &str) -> Option<RegisteredCheck> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}
