//! Error types for the rule-guard validation engine.
//!
//! Only programmer-contract violations surface as `RuleError`. A value that
//! does not satisfy a check is never an error: it becomes a message entry on
//! the [`Rule`](crate::Rule). Infrastructure failures inside deferred checks
//! are caught at the pending boundary and turned into the `error` template.

use thiserror::Error;

/// The main error type for rule-guard.
#[derive(Error, Debug)]
pub enum RuleError {
    /// A check that reads the value was invoked before `Rule::value` was called.
    #[error("Validator value not set for field '{field}'")]
    ValueNotSet {
        /// Field the rule was bound to (may be empty)
        field: String,
    },

    /// The mode string is not one of `interactive`, `conservative` or `manual`.
    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    /// A regex source string could not be compiled.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern source
        pattern: String,
        /// Compiler diagnostic
        message: String,
    },

    /// `Rule::apply` was called with a name that is not registered.
    #[error("Unknown check: {0}")]
    UnknownCheck(String),

    /// A remote check was requested but no HTTP requester is configured.
    #[error("No HTTP requester configured for remote checks")]
    MissingHttpRequester,

    /// The remote validation request failed.
    #[error("HTTP error: {message}")]
    Http {
        /// Detailed error message
        message: String,
        /// Response status, when the server answered
        status: Option<u16>,
    },

    /// A deferred custom callback reported a failure.
    #[error("Callback failed: {0}")]
    Callback(String),

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, RuleError>`.
pub type Result<T> = std::result::Result<T, RuleError>;

impl RuleError {
    /// Creates a value-not-set error for the given field.
    pub fn value_not_set(field: impl Into<String>) -> Self {
        Self::ValueNotSet {
            field: field.into(),
        }
    }

    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates an HTTP error without a status code (transport failure).
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
            status: None,
        }
    }

    /// Creates an HTTP error for a non-success response.
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
            status: Some(status),
        }
    }

    /// Returns true for errors that signal a bug in the calling code rather
    /// than a failing dependency.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            RuleError::ValueNotSet { .. }
                | RuleError::InvalidMode(_)
                | RuleError::InvalidPattern { .. }
                | RuleError::UnknownCheck(_)
                | RuleError::MissingHttpRequester
        )
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<RuleError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| match e.into() {
            RuleError::Internal(inner) => RuleError::Internal(format!("{msg}: {inner}")),
            other => RuleError::Internal(format!("{msg}: {other}")),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            match e.into() {
                RuleError::Internal(inner) => RuleError::Internal(format!("{msg}: {inner}")),
                other => RuleError::Internal(format!("{msg}: {other}")),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_not_set_error() {
        let err = RuleError::value_not_set("email");
        assert_eq!(err.to_string(), "Validator value not set for field 'email'");
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_invalid_mode() {
        let err = RuleError::InvalidMode("eager".to_string());
        assert_eq!(err.to_string(), "Invalid mode: eager");
    }

    #[test]
    fn test_http_errors_are_not_contract_violations() {
        let err = RuleError::http_status(503, "Service Unavailable");
        assert!(!err.is_contract_violation());
        match err {
            RuleError::Http { status, .. } => assert_eq!(status, Some(503)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_serialization_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RuleError = json_err.into();
        assert!(err.to_string().starts_with("Serialization error"));
    }

    #[test]
    fn test_error_context() {
        fn failing_operation() -> Result<()> {
            Err(RuleError::Internal("Something went wrong".to_string()))
        }

        let result = failing_operation().context("While loading templates");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("While loading templates"));
        assert!(err.to_string().contains("Something went wrong"));
    }
}
