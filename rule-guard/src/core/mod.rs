//! Core rule evaluation types.
//!
//! ## Overview
//!
//! - **[`Rule`]**: a chainable evaluator bound to one field and value
//! - **[`Validator`]**: shorthand constructors that start a fresh [`Rule`]
//! - **[`MessageEntry`]**: one ordered entry, resolved or pending
//! - **[`PendingMessage`]**: a shareable handle to a deferred message
//! - **[`CustomOutcome`]**: what a `custom` callback may return
//!
//! ## Message flow
//!
//! ```text
//! Rule::value(v)
//!     ├── required()      -> Resolved("Required.")   (sync)
//!     ├── custom(..)      -> Pending(..)             (deferred)
//!     └── max_length(3)   -> Resolved("Must have up to 3 characters.")
//!
//! Rule::settle().await    -> ["Required.", <deferred result>, "Must have ..."]
//! ```
//!
//! Pending entries keep their slot: settling replaces each one with its
//! result, or removes it when the deferred check passed.

pub mod message;
pub mod rule;
pub mod validator;

pub use message::{BoxError, CustomOutcome, DeferredMessage, MessageEntry, PendingMessage};
pub use rule::Rule;
pub use validator::Validator;
