//! Prelude for commonly used types and traits in rule-guard.

pub use crate::checks::{Check, LengthAssertion, NumericAssertion, Pattern, PatternCheck};
pub use crate::config::{HttpConfig, Mode, ValidatorConfig};
pub use crate::core::{CustomOutcome, MessageEntry, PendingMessage, Rule, Validator};
pub use crate::error::{ErrorContext, Result, RuleError};
pub use crate::logging::LogConfig;
pub use crate::registry::{add_rule, RegisteredCheck};
pub use crate::remote::{requester_fn, HttpRequester, HttpResponse};
pub use crate::templates::Templates;
pub use crate::value::{Params, Value};
