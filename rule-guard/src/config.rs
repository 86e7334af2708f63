//! Process-wide configuration.
//!
//! Configuration is applied once at startup, either piecemeal
//! ([`set_mode`], [`extend_templates`](crate::extend_templates),
//! [`set_http_requester`](crate::remote::set_http_requester)) or in one go with
//! [`ValidatorConfig::install`]. Rules read it when they are constructed.
//!
//! ```rust
//! use rule_guard::config::{Mode, ValidatorConfig};
//!
//! let config = ValidatorConfig::from_json(r#"{
//!     "mode": "conservative",
//!     "templates": { "required": "Please fill in this field." }
//! }"#).unwrap();
//! assert_eq!(config.mode, Mode::Conservative);
//! ```

use crate::error::{ErrorContext, Result, RuleError};
use crate::logging::LogConfig;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// When the host integration should trigger validation.
///
/// The engine itself does not interpret the mode; it is stored for the
/// integration layer to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Validate on every change
    #[default]
    Interactive,
    /// Validate once the user leaves the field
    Conservative,
    /// Validate only on explicit request
    Manual,
}

impl Mode {
    /// Returns the lowercase name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Interactive => "interactive",
            Mode::Conservative => "conservative",
            Mode::Manual => "manual",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "interactive" => Ok(Mode::Interactive),
            "conservative" => Ok(Mode::Conservative),
            "manual" => Ok(Mode::Manual),
            other => Err(RuleError::InvalidMode(other.to_string())),
        }
    }
}

static MODE: Lazy<RwLock<Mode>> = Lazy::new(|| RwLock::new(Mode::default()));

static LOG_CONFIG: Lazy<RwLock<LogConfig>> = Lazy::new(|| RwLock::new(LogConfig::default()));

/// Sets the process-wide mode from its name.
///
/// # Errors
///
/// Returns [`RuleError::InvalidMode`] for anything other than `interactive`,
/// `conservative` or `manual`. The current mode is left unchanged.
pub fn set_mode(mode: &str) -> Result<()> {
    let parsed = mode.parse::<Mode>()?;
    *MODE.write().unwrap_or_else(PoisonError::into_inner) = parsed;
    tracing::debug!(mode = %parsed, "Validation mode set");
    Ok(())
}

/// Returns the process-wide mode.
pub fn mode() -> Mode {
    *MODE.read().unwrap_or_else(PoisonError::into_inner)
}

/// Sets the logging behaviour of rules constructed afterwards.
pub fn set_log_config(config: LogConfig) {
    *LOG_CONFIG.write().unwrap_or_else(PoisonError::into_inner) = config;
}

/// Returns the logging behaviour applied to new rules.
pub fn log_config() -> LogConfig {
    LOG_CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Transport settings for remote validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Base URL that relative check URLs are joined onto
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: IndexMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: default_timeout_ms(),
            headers: IndexMap::new(),
        }
    }
}

impl HttpConfig {
    /// Creates a configuration with the given base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    /// Adds a header sent with every request.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// The request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Everything that can be configured at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Template overrides merged into the defaults
    pub templates: HashMap<String, String>,
    /// Validation trigger mode
    pub mode: Mode,
    /// Remote validation transport, if any
    pub http: Option<HttpConfig>,
    /// Rule logging behaviour
    #[serde(skip)]
    pub log: LogConfig,
}

impl ValidatorConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or has the wrong shape.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse validator configuration")
    }

    /// Applies the configuration to the process-wide state.
    ///
    /// Templates are merged into the defaults, the mode and log settings are
    /// replaced, and when an HTTP configuration with a base URL is present
    /// (and the `http` feature is enabled) a [`ReqwestRequester`](crate::remote::ReqwestRequester)
    /// is installed.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::Configuration`] if the HTTP client cannot be built.
    pub fn install(&self) -> Result<()> {
        if !self.templates.is_empty() {
            crate::templates::extend_templates(&self.templates);
        }
        *MODE.write().unwrap_or_else(PoisonError::into_inner) = self.mode;
        set_log_config(self.log.clone());

        #[cfg(feature = "http")]
        {
            if let Some(http) = self.http.as_ref().filter(|h| h.base_url.is_some()) {
                let requester = crate::remote::ReqwestRequester::new(http.clone())?;
                crate::remote::set_http_requester(std::sync::Arc::new(requester));
            }
        }

        tracing::info!(
            mode = %self.mode,
            templates = self.templates.len(),
            "Validator configuration installed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("manual".parse::<Mode>().unwrap(), Mode::Manual);
        assert_eq!(Mode::Conservative.to_string(), "conservative");
        let err = "eager".parse::<Mode>().unwrap_err();
        assert!(matches!(err, RuleError::InvalidMode(ref m) if m == "eager"));
    }

    #[test]
    fn test_mode_is_case_sensitive() {
        assert!("Manual".parse::<Mode>().is_err());
    }

    #[test]
    fn test_set_mode_rejects_invalid_and_keeps_previous() {
        let before = mode();
        assert!(set_mode("sometimes").is_err());
        assert_eq!(mode(), before);
    }

    #[test]
    fn test_mode_serde() {
        let json = serde_json::to_string(&Mode::Interactive).unwrap();
        assert_eq!(json, "\"interactive\"");
        let parsed: Mode = serde_json::from_str("\"manual\"").unwrap();
        assert_eq!(parsed, Mode::Manual);
    }

    #[test]
    fn test_http_config_defaults() {
        let config: HttpConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.base_url.is_none());

        let config = HttpConfig::with_base_url("https://api.example.com")
            .with_header("Authorization", "Bearer token");
        assert_eq!(
            config.headers.get("Authorization").map(String::as_str),
            Some("Bearer token")
        );
    }

    #[test]
    fn test_validator_config_from_json() {
        let config = ValidatorConfig::from_json(
            r#"{"mode": "manual", "http": {"base_url": "https://api.example.com", "timeout_ms": 500}}"#,
        )
        .unwrap();
        assert_eq!(config.mode, Mode::Manual);
        assert!(config.templates.is_empty());
        let http = config.http.unwrap();
        assert_eq!(http.timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_validator_config_rejects_unknown_mode() {
        let err = ValidatorConfig::from_json(r#"{"mode": "eager"}"#).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Failed to parse validator configuration"));
    }
}
