//! Message entries and deferred message resolution.
//!
//! A failing synchronous check appends a [`MessageEntry::Resolved`] string.
//! Deferred checks (`custom` returning a future, `unique`) append a
//! [`MessageEntry::Pending`] wrapping a [`PendingMessage`]. Pending messages
//! never fail: an error or panic inside the deferred computation is logged and
//! the entry resolves to the `error` template.

use futures::future::{BoxFuture, FutureExt, Shared, TryFutureExt};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Error type accepted from deferred computations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A boxed deferred computation producing a failure message or nothing.
pub type DeferredMessage = BoxFuture<'static, Result<Option<String>, BoxError>>;

/// What a `custom` callback returned.
///
/// Conversions mirror a loose "falsy means valid" contract: `()`, `None` and
/// the empty string all become [`CustomOutcome::Pass`].
///
/// ```rust
/// use rule_guard::CustomOutcome;
///
/// assert!(matches!(CustomOutcome::from(""), CustomOutcome::Pass));
/// assert!(matches!(CustomOutcome::from(None::<String>), CustomOutcome::Pass));
/// assert!(matches!(CustomOutcome::from("Taken."), CustomOutcome::Message(_)));
/// ```
pub enum CustomOutcome {
    /// No failure
    Pass,
    /// A failure message, available immediately
    Message(String),
    /// A failure message that is only known once the future completes
    Deferred(DeferredMessage),
}

impl CustomOutcome {
    /// Wraps a fallible future.
    ///
    /// An `Err` resolves the entry to the `error` template.
    pub fn deferred<F, E>(future: F) -> Self
    where
        F: Future<Output = Result<Option<String>, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Self::Deferred(future.map_err(|e| -> BoxError { e.into() }).boxed())
    }

    /// Wraps a future that cannot fail.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Option<String>> + Send + 'static,
    {
        Self::Deferred(future.map(Ok).boxed())
    }
}

impl fmt::Debug for CustomOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomOutcome::Pass => f.write_str("Pass"),
            CustomOutcome::Message(message) => f.debug_tuple("Message").field(message).finish(),
            CustomOutcome::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<()> for CustomOutcome {
    fn from(_: ()) -> Self {
        CustomOutcome::Pass
    }
}

impl From<String> for CustomOutcome {
    fn from(message: String) -> Self {
        if message.is_empty() {
            CustomOutcome::Pass
        } else {
            CustomOutcome::Message(message)
        }
    }
}

impl From<&str> for CustomOutcome {
    fn from(message: &str) -> Self {
        CustomOutcome::from(message.to_string())
    }
}

impl<S: Into<String>> From<Option<S>> for CustomOutcome {
    fn from(message: Option<S>) -> Self {
        message.map_or(CustomOutcome::Pass, |m| CustomOutcome::from(m.into()))
    }
}

/// A handle to a message that resolves asynchronously.
///
/// Cloning is cheap and every clone observes the same result. The underlying
/// future is lazy: it only runs when something awaits [`resolve`](Self::resolve)
/// (usually [`Rule::settle`](crate::Rule::settle)).
#[derive(Clone)]
pub struct PendingMessage {
    inner: Shared<BoxFuture<'static, Option<String>>>,
}

impl PendingMessage {
    pub(crate) fn new(
        deferred: DeferredMessage,
        fallback: String,
        field: String,
        log_deferred: bool,
    ) -> Self {
        let guarded = async move {
            let outcome = match AssertUnwindSafe(deferred).catch_unwind().await {
                Ok(Ok(message)) => message.filter(|m| !m.is_empty()),
                Ok(Err(e)) => {
                    tracing::error!(field = %field, error = %e, "Deferred check failed");
                    Some(fallback)
                }
                Err(panic) => {
                    tracing::error!(
                        field = %field,
                        panic = %panic_message(panic.as_ref()),
                        "Deferred check panicked"
                    );
                    Some(fallback)
                }
            };
            if log_deferred {
                tracing::debug!(
                    field = %field,
                    failed = outcome.is_some(),
                    "Deferred check resolved"
                );
            }
            outcome
        };

        Self {
            inner: guarded.boxed().shared(),
        }
    }

    /// Drives the computation to completion and returns its message.
    pub async fn resolve(&self) -> Option<String> {
        self.inner.clone().await
    }

    /// Returns the outcome if the computation has already completed.
    pub fn peek(&self) -> Option<Option<String>> {
        self.inner.peek().cloned()
    }

    /// Returns true once the computation has completed.
    pub fn is_settled(&self) -> bool {
        self.inner.peek().is_some()
    }
}

impl fmt::Debug for PendingMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingMessage")
            .field("outcome", &self.peek())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// One entry in a rule's ordered message list.
#[derive(Debug, Clone)]
pub enum MessageEntry {
    /// A message known at check time
    Resolved(String),
    /// A message produced by a deferred check
    Pending(PendingMessage),
}

impl MessageEntry {
    /// Returns the message if it is already resolved.
    pub fn as_resolved(&self) -> Option<&str> {
        match self {
            MessageEntry::Resolved(message) => Some(message),
            MessageEntry::Pending(_) => None,
        }
    }

    /// Returns true for entries still backed by a deferred computation.
    pub fn is_pending(&self) -> bool {
        matches!(self, MessageEntry::Pending(_))
    }

    /// Resolves the entry; `None` means the deferred check passed.
    pub async fn resolve(&self) -> Option<String> {
        match self {
            MessageEntry::Resolved(message) => Some(message.clone()),
            MessageEntry::Pending(pending) => pending.resolve().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;

    fn pending(outcome: CustomOutcome) -> PendingMessage {
        match outcome {
            CustomOutcome::Deferred(deferred) => {
                PendingMessage::new(deferred, "Error.".to_string(), "field".to_string(), true)
            }
            other => panic!("expected a deferred outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_outcome_conversions() {
        assert!(matches!(CustomOutcome::from(()), CustomOutcome::Pass));
        assert!(matches!(
            CustomOutcome::from(String::new()),
            CustomOutcome::Pass
        ));
        assert!(matches!(
            CustomOutcome::from(Some("bad")),
            CustomOutcome::Message(ref m) if m == "bad"
        ));
    }

    #[tokio::test]
    async fn test_pending_resolves_message() {
        let entry = pending(CustomOutcome::pending(async { Some("Taken.".to_string()) }));
        assert!(!entry.is_settled());
        assert_eq!(entry.resolve().await.as_deref(), Some("Taken."));
        assert!(entry.is_settled());
        assert_eq!(entry.peek(), Some(Some("Taken.".to_string())));
    }

    #[tokio::test]
    async fn test_pending_empty_string_is_a_pass() {
        let entry = pending(CustomOutcome::pending(async { Some(String::new()) }));
        assert_eq!(entry.resolve().await, None);
    }

    #[tokio::test]
    async fn test_pending_error_becomes_fallback() {
        let entry = pending(CustomOutcome::deferred(async {
            Err::<Option<String>, _>(RuleError::Callback("lookup failed".to_string()))
        }));
        assert_eq!(entry.resolve().await.as_deref(), Some("Error."));
    }

    #[tokio::test]
    async fn test_pending_panic_becomes_fallback() {
        async fn explode() -> Option<String> {
            panic!("callback exploded")
        }

        let entry = pending(CustomOutcome::pending(explode()));
        assert_eq!(entry.resolve().await.as_deref(), Some("Error."));
    }

    #[tokio::test]
    async fn test_clones_share_the_result() {
        let entry = pending(CustomOutcome::pending(async { Some("once".to_string()) }));
        let clone = entry.clone();
        assert_eq!(entry.resolve().await.as_deref(), Some("once"));
        assert!(clone.is_settled());
        assert_eq!(clone.resolve().await.as_deref(), Some("once"));
    }

    #[tokio::test]
    async fn test_entry_resolve() {
        let entry = MessageEntry::Resolved("Required.".to_string());
        assert_eq!(entry.as_resolved(), Some("Required."));
        assert!(!entry.is_pending());
        assert_eq!(entry.resolve().await.as_deref(), Some("Required."));
    }
}
