//! # rule-guard - Chainable Field Validation
//!
//! rule-guard is a fluent validation engine for form-style input. A [`Rule`]
//! is bound to one field and value; checks are chained onto it and every
//! failing check appends a human-readable message. Some checks (remote
//! uniqueness, user callbacks returning futures) only know their outcome
//! later: they append a pending entry that keeps its position in the list
//! until [`Rule::settle`] resolves it.
//!
//! ## Quick Start
//!
//! ```rust
//! use rule_guard::prelude::*;
//!
//! # async fn example() -> rule_guard::Result<()> {
//! let mut rule = Rule::new();
//! rule.field("age")
//!     .value("17")
//!     .required()?
//!     .integer()?
//!     .greater_than_or_equal_to(18.0)?;
//!
//! let messages = rule.settle().await;
//! assert_eq!(messages, vec!["Must be greater than or equal to 18."]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Features
//!
//! - **Built-in checks**: presence, numeric bounds, length, membership,
//!   equality, regex, digit, email and url
//! - **Deferred checks**: `custom` callbacks may return futures; `unique`
//!   asks a remote endpoint whether a value is taken
//! - **Templates**: every message comes from a named template with `{0}`
//!   placeholders, overridable per rule or process-wide
//! - **Registry**: extra named checks can be registered at startup and run
//!   with [`Rule::apply`]
//!
//! ## Error Model
//!
//! A failing check is data, never an error. [`RuleError`] is reserved for
//! misuse such as running a check before a value was set. Failures inside
//! deferred checks are logged and surface as the `error` template message.
//!
//! ## Architecture
//!
//! - **`core`**: [`Rule`], [`Validator`] and the message entry types
//! - **`checks`**: the built-in [`Check`] set
//! - **`templates`**: message templates and the process-wide defaults
//! - **`registry`**: runtime-registered checks
//! - **`remote`**: the [`HttpRequester`](remote::HttpRequester) capability used by `unique`
//! - **`config`**: mode, transport and startup configuration
//! - **`utils`**: emptiness, numeric coercion, formatting, URL params, debounce
//! - **`logging`**: `tracing` helpers and subscriber setup

pub mod checks;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod registry;
pub mod remote;
pub mod templates;
pub mod utils;
pub mod value;

pub use crate::checks::Check;
pub use crate::config::{mode, set_mode, Mode, ValidatorConfig};
pub use crate::core::{CustomOutcome, MessageEntry, PendingMessage, Rule, Validator};
pub use crate::error::{Result, RuleError};
pub use crate::registry::{add_rule, RegisteredCheck};
pub use crate::remote::set_http_requester;
pub use crate::templates::{extend_templates, Templates};
pub use crate::value::{Params, Value};
