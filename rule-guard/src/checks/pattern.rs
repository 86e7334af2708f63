//! Regular expression checks and the built-in `digit`, `email` and `url` patterns.

use crate::error::{Result, RuleError};
use crate::templates::{keys, Templates};
use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Cache for compiled regex patterns to avoid recompiling
static REGEX_CACHE: Lazy<RwLock<HashMap<String, Regex>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

static DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[0-9]*$").expect("Hard-coded regex pattern should be valid")
});

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("Hard-coded regex pattern should be valid")
});

// Unanchored: any http(s) URL inside the value is accepted. Word characters
// are ASCII only.
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(
        r"(http|https)://[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)+([A-Za-z0-9_.,@?^=%&;:/~+#-]*[A-Za-z0-9_@?^=%&;/~+#-])?",
    )
    .expect("Hard-coded regex pattern should be valid")
});

/// A regular expression given either as source text or already compiled.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Source text, compiled (and cached) on first use
    Source(String),
    /// A compiled expression
    Compiled(Regex),
}

impl Pattern {
    /// Returns the compiled expression.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] if the source does not compile.
    pub fn compile(&self) -> Result<Regex> {
        match self {
            Pattern::Compiled(regex) => Ok(regex.clone()),
            Pattern::Source(source) => compile_cached(source),
        }
    }

    /// The pattern source text.
    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Compiled(regex) => regex.as_str(),
            Pattern::Source(source) => source,
        }
    }
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Pattern::Source(source.to_string())
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Pattern::Source(source)
    }
}

impl From<Regex> for Pattern {
    fn from(regex: Regex) -> Self {
        Pattern::Compiled(regex)
    }
}

fn compile_cached(source: &str) -> Result<Regex> {
    {
        let cache = REGEX_CACHE.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(regex) = cache.get(source) {
            return Ok(regex.clone());
        }
    }

    let regex = Regex::new(source)
        .map_err(|e| RuleError::invalid_pattern(source, e.to_string()))?;
    REGEX_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(source.to_string(), regex.clone());
    Ok(regex)
}

/// A pattern-based check.
#[derive(Debug, Clone)]
pub enum PatternCheck {
    /// Caller supplied expression
    Regex(Pattern),
    /// Only ASCII digits
    Digit,
    /// An email address
    Email,
    /// Contains an http(s) URL
    Url,
}

impl PatternCheck {
    /// Name of the template used when the value does not match.
    pub fn template_key(&self) -> &'static str {
        match self {
            PatternCheck::Regex(_) => keys::REGEX,
            PatternCheck::Digit => keys::DIGIT,
            PatternCheck::Email => keys::EMAIL,
            PatternCheck::Url => keys::URL,
        }
    }

    fn regex(&self) -> Result<Regex> {
        match self {
            PatternCheck::Regex(pattern) => pattern.compile(),
            PatternCheck::Digit => Ok(DIGIT_REGEX.clone()),
            PatternCheck::Email => Ok(EMAIL_REGEX.clone()),
            PatternCheck::Url => Ok(URL_REGEX.clone()),
        }
    }

    pub(crate) fn evaluate(&self, value: &Value, templates: &Templates) -> Result<Option<String>> {
        let regex = self.regex()?;
        Ok((!regex.is_match(&value.to_text()))
            .then(|| templates.get(self.template_key()).to_string()))
    }
}
