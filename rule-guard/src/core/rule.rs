//! The chainable rule evaluator.

use crate::checks::{Check, LengthAssertion, NumericAssertion, Pattern, PatternCheck};
use crate::config::log_config;
use crate::core::message::{
    BoxError, CustomOutcome, DeferredMessage, MessageEntry, PendingMessage,
};
use crate::error::{Result, RuleError};
use crate::logging::{truncate_field, LogConfig};
use crate::remote::{http_requester, HttpRequester};
use crate::templates::{default_templates, keys, Templates};
use crate::utils::{clean_object, replace_params_in_url};
use crate::value::{Params, Value};
use crate::{log_check, perf_debug, registry};
use futures::future::{join_all, FutureExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

/// A chainable validation rule for one field and value.
///
/// Each check inspects the value and, when it fails, appends a message.
/// Checks return `&mut Self` so they can be chained; checks that read the
/// value return `Result` because reading it before [`value`](Self::value)
/// was called is a programming error.
///
/// Messages keep the order in which the checks were invoked, including
/// deferred ones added by [`custom`](Self::custom) and [`unique`](Self::unique).
/// Call [`settle`](Self::settle) to drive deferred entries to completion.
///
/// # Examples
///
/// ```rust
/// use rule_guard::Rule;
///
/// # async fn example() -> rule_guard::Result<()> {
/// let mut rule = Rule::new();
/// rule.field("username")
///     .value("toolong")
///     .required()?
///     .max_length(3)?;
///
/// assert_eq!(rule.settle().await, vec!["Must have up to 3 characters."]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    field: String,
    value: Option<Value>,
    messages: Vec<MessageEntry>,
    templates: Arc<Templates>,
    requester: Option<Arc<dyn HttpRequester>>,
    log: LogConfig,
}

impl Default for Rule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule {
    /// Creates a rule using the process-wide default templates.
    ///
    /// The defaults are shared, not copied. The process-wide HTTP requester
    /// and log configuration, if any, are picked up as well.
    pub fn new() -> Self {
        Self::with_template_set(default_templates())
    }

    /// Creates a rule whose templates are `overrides` merged over the defaults.
    pub fn with_templates(overrides: &HashMap<String, String>) -> Self {
        Self::with_template_set(Arc::new(default_templates().merged(overrides)))
    }

    /// Creates a rule with an explicit template set.
    pub fn with_template_set(templates: Arc<Templates>) -> Self {
        Self {
            field: String::new(),
            value: None,
            messages: Vec::new(),
            templates,
            requester: http_requester(),
            log: log_config(),
        }
    }

    /// Uses `requester` for remote checks instead of the process-wide one.
    pub fn with_http_requester(mut self, requester: Arc<dyn HttpRequester>) -> Self {
        self.requester = Some(requester);
        self
    }

    /// Overrides the logging behaviour for this rule.
    pub fn with_log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Sets the field name.
    pub fn field(&mut self, field: impl Into<String>) -> &mut Self {
        self.field = field.into();
        self
    }

    /// Sets the value under test.
    ///
    /// [`Value::Absent`] counts as a value: checks skip it instead of
    /// reporting [`RuleError::ValueNotSet`].
    pub fn value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.value = Some(value.into());
        self
    }

    /// The field name, empty if none was set.
    pub fn field_name(&self) -> &str {
        &self.field
    }

    /// The value under test, if one was set.
    pub fn current_value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The templates this rule formats messages with.
    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    fn check_value(&self) -> Result<&Value> {
        self.value
            .as_ref()
            .ok_or_else(|| RuleError::value_not_set(&self.field))
    }

    /// Runs a built-in check.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::ValueNotSet`] if no value was set, or
    /// [`RuleError::InvalidPattern`] for a regex source that does not compile.
    pub fn check(&mut self, check: Check) -> Result<&mut Self> {
        self.run(&check, None)
    }

    /// Runs a built-in check, reporting `message` instead of the template on
    /// failure. An empty `message` falls back to the template.
    ///
    /// # Errors
    ///
    /// Same as [`check`](Self::check).
    pub fn check_with_message(
        &mut self,
        check: Check,
        message: impl Into<String>,
    ) -> Result<&mut Self> {
        let message = message.into();
        self.run(&check, Some(message).filter(|m| !m.is_empty()))
    }

    fn run(&mut self, check: &Check, message: Option<String>) -> Result<&mut Self> {
        let value = self.check_value()?;
        if let Some(failure) = check.evaluate(value, &self.templates)? {
            log_check!(
                self.log,
                field = %self.field,
                check = check.name(),
                kind = value.kind(),
                value = %truncate_field(&value.to_text(), self.log.max_field_length),
                "Check failed"
            );
            self.messages
                .push(MessageEntry::Resolved(message.unwrap_or(failure)));
        }
        Ok(self)
    }

    /// Fails when the value is empty.
    pub fn required(&mut self) -> Result<&mut Self> {
        self.check(Check::Required)
    }

    /// Fails when the value does not start with a number.
    pub fn float(&mut self) -> Result<&mut Self> {
        self.check(Check::Float)
    }

    /// Fails when the value is not an integer.
    pub fn integer(&mut self) -> Result<&mut Self> {
        self.check(Check::Integer)
    }

    /// Fails unless the value is a number below `bound`.
    pub fn less_than(&mut self, bound: f64) -> Result<&mut Self> {
        self.check(Check::Numeric(NumericAssertion::LessThan(bound)))
    }

    /// Fails unless the value is a number no greater than `bound`.
    pub fn less_than_or_equal_to(&mut self, bound: f64) -> Result<&mut Self> {
        self.check(Check::Numeric(NumericAssertion::LessThanOrEqualTo(bound)))
    }

    /// Fails unless the value is a number above `bound`.
    pub fn greater_than(&mut self, bound: f64) -> Result<&mut Self> {
        self.check(Check::Numeric(NumericAssertion::GreaterThan(bound)))
    }

    /// Fails unless the value is a number no less than `bound`.
    pub fn greater_than_or_equal_to(&mut self, bound: f64) -> Result<&mut Self> {
        let assertion = NumericAssertion::GreaterThanOrEqualTo(bound);
        self.check(Check::Numeric(assertion))
    }

    /// Fails unless the value is a number in `[low, high]`.
    pub fn between(&mut self, low: f64, high: f64) -> Result<&mut Self> {
        self.check(Check::Numeric(NumericAssertion::Between(low, high)))
    }

    /// Fails when a list value does not have exactly `size` items.
    pub fn size(&mut self, size: usize) -> Result<&mut Self> {
        self.check(Check::Size(size))
    }

    /// Fails unless the string form has exactly `length` characters.
    pub fn length(&mut self, length: usize) -> Result<&mut Self> {
        self.check(Check::Length(LengthAssertion::Exactly(length)))
    }

    /// Fails when the string form is shorter than `min` characters.
    pub fn min_length(&mut self, min: usize) -> Result<&mut Self> {
        self.check(Check::Length(LengthAssertion::Min(min)))
    }

    /// Fails when the string form is longer than `max` characters.
    pub fn max_length(&mut self, max: usize) -> Result<&mut Self> {
        self.check(Check::Length(LengthAssertion::Max(max)))
    }

    /// Fails unless the string form has between `min` and `max` characters.
    pub fn length_between(&mut self, min: usize, max: usize) -> Result<&mut Self> {
        self.check(Check::Length(LengthAssertion::Between(min, max)))
    }

    /// Fails unless the value equals one of `options`.
    pub fn is_in<I, V>(&mut self, options: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.check(Check::In(options.into_iter().map(Into::into).collect()))
    }

    /// Fails when the value equals one of `options`.
    pub fn not_in<I, V>(&mut self, options: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.check(Check::NotIn(options.into_iter().map(Into::into).collect()))
    }

    /// Fails unless the value equals `expected`.
    pub fn matches(&mut self, expected: impl Into<Value>) -> Result<&mut Self> {
        self.check(Check::Match(expected.into()))
    }

    /// Fails when the string form does not match `pattern`.
    pub fn regex(&mut self, pattern: impl Into<Pattern>) -> Result<&mut Self> {
        self.check(Check::Pattern(PatternCheck::Regex(pattern.into())))
    }

    /// Fails unless the value consists of digits only.
    pub fn digit(&mut self) -> Result<&mut Self> {
        self.check(Check::Pattern(PatternCheck::Digit))
    }

    /// Fails unless the value is an email address.
    pub fn email(&mut self) -> Result<&mut Self> {
        self.check(Check::Pattern(PatternCheck::Email))
    }

    /// Fails unless the value contains an http(s) URL.
    pub fn url(&mut self) -> Result<&mut Self> {
        self.check(Check::Pattern(PatternCheck::Url))
    }

    /// Runs a check registered with [`add_rule`](crate::add_rule).
    ///
    /// `args` are passed to the predicate and fill the template placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownCheck`] if nothing is registered under
    /// `name`, or [`RuleError::ValueNotSet`] if no value was set.
    pub fn apply(&mut self, name: &str, args: &[Value]) -> Result<&mut Self> {
        self.run_registered(name, args, None)
    }

    /// Like [`apply`](Self::apply), reporting `message` instead of the
    /// template. An empty `message` falls back to the template.
    ///
    /// # Errors
    ///
    /// Same as [`apply`](Self::apply).
    pub fn apply_with_message(
        &mut self,
        name: &str,
        args: &[Value],
        message: impl Into<String>,
    ) -> Result<&mut Self> {
        let message = message.into();
        self.run_registered(name, args, Some(message).filter(|m| !m.is_empty()))
    }

    fn run_registered(
        &mut self,
        name: &str,
        args: &[Value],
        message: Option<String>,
    ) -> Result<&mut Self> {
        let check = registry::lookup(name)
            .ok_or_else(|| RuleError::UnknownCheck(name.to_string()))?;
        let value = self.check_value()?;
        if let Some(failure) = check.evaluate(value, args, &self.templates) {
            log_check!(
                self.log,
                field = %self.field,
                check = name,
                kind = value.kind(),
                value = %truncate_field(&value.to_text(), self.log.max_field_length),
                "Registered check failed"
            );
            self.messages
                .push(MessageEntry::Resolved(message.unwrap_or(failure)));
        }
        Ok(self)
    }

    /// Runs a caller-defined check.
    ///
    /// The callback takes no arguments; capture what it needs. It may return
    /// nothing, a message, or a deferred computation (see [`CustomOutcome`]).
    ///
    /// ```rust
    /// use rule_guard::{CustomOutcome, Rule};
    ///
    /// # async fn example() {
    /// let password = "secret";
    /// let confirmation = "secre";
    ///
    /// let mut rule = Rule::new();
    /// rule.custom(|| (password != confirmation).then_some("Passwords differ."))
    ///     .custom(|| CustomOutcome::pending(async { None }));
    ///
    /// assert_eq!(rule.settle().await, vec!["Passwords differ."]);
    /// # }
    /// ```
    pub fn custom<F, O>(&mut self, callback: F) -> &mut Self
    where
        F: FnOnce() -> O,
        O: Into<CustomOutcome>,
    {
        let outcome = callback().into();
        self.push_outcome(outcome);
        self
    }

    /// Runs a caller-defined check bound to `context`.
    pub fn custom_with<C, F, O>(&mut self, context: &C, callback: F) -> &mut Self
    where
        C: ?Sized,
        F: FnOnce(&C) -> O,
        O: Into<CustomOutcome>,
    {
        let outcome = callback(context).into();
        self.push_outcome(outcome);
        self
    }

    fn push_outcome(&mut self, outcome: CustomOutcome) {
        match outcome {
            CustomOutcome::Pass => {}
            CustomOutcome::Message(message) => {
                log_check!(self.log, field = %self.field, check = "custom", "Check failed");
                self.messages.push(MessageEntry::Resolved(message));
            }
            CustomOutcome::Deferred(deferred) => {
                let pending = self.pending_entry(deferred);
                self.messages.push(MessageEntry::Pending(pending));
            }
        }
    }

    fn pending_entry(&self, deferred: DeferredMessage) -> PendingMessage {
        PendingMessage::new(
            deferred,
            self.templates.get(keys::ERROR).to_string(),
            self.field.clone(),
            self.log.log_deferred,
        )
    }

    /// Checks remotely that the value is not already taken.
    ///
    /// Empty entries are pruned from `params`; `{key}` placeholders in `url`
    /// are filled from `params` and the remaining entries are sent as the
    /// query. Nothing happens when `url` or the pruned `params` are empty.
    ///
    /// A pending entry is appended that resolves to the `unique` template if
    /// the response reports that the value exists, or to the `error` template
    /// if the request fails.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::MissingHttpRequester`] if no requester is
    /// configured.
    pub fn unique(&mut self, url: &str, params: Params) -> Result<&mut Self> {
        self.run_unique(url, params, None)
    }

    /// Like [`unique`](Self::unique), reporting `message` instead of the template.
    ///
    /// # Errors
    ///
    /// Same as [`unique`](Self::unique).
    pub fn unique_with_message(
        &mut self,
        url: &str,
        params: Params,
        message: impl Into<String>,
    ) -> Result<&mut Self> {
        let message = message.into();
        self.run_unique(url, params, Some(message).filter(|m| !m.is_empty()))
    }

    fn run_unique(
        &mut self,
        url: &str,
        mut params: Params,
        message: Option<String>,
    ) -> Result<&mut Self> {
        clean_object(&mut params);
        if url.trim().is_empty() || params.is_empty() {
            perf_debug!(
                self.log,
                field = %self.field,
                "Skipping unique check without url or params"
            );
            return Ok(self);
        }

        let requester = self
            .requester
            .clone()
            .ok_or(RuleError::MissingHttpRequester)?;
        let url = replace_params_in_url(url, &mut params);
        let failure = message.unwrap_or_else(|| self.templates.get(keys::UNIQUE).to_string());

        perf_debug!(self.log, field = %self.field, url = %url, "Queued unique check");
        let deferred: DeferredMessage = async move {
            let response = requester.get(&url, &params).await?;
            Ok::<_, BoxError>(response.exists().then_some(failure))
        }
        .boxed();

        let pending = self.pending_entry(deferred);
        self.messages.push(MessageEntry::Pending(pending));
        Ok(self)
    }

    /// All entries in check order, resolved or not.
    pub fn messages(&self) -> &[MessageEntry] {
        &self.messages
    }

    /// Messages that are already known, in check order.
    ///
    /// Pending entries are left out until [`settle`](Self::settle) resolves them.
    pub fn resolved_messages(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter_map(MessageEntry::as_resolved)
            .collect()
    }

    /// Handles to the entries that are still pending.
    pub fn pending(&self) -> Vec<&PendingMessage> {
        self.messages
            .iter()
            .filter_map(|entry| match entry {
                MessageEntry::Pending(pending) => Some(pending),
                MessageEntry::Resolved(_) => None,
            })
            .collect()
    }

    /// Returns true while any entry is still pending.
    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(MessageEntry::is_pending)
    }

    /// Returns true if at least one message has been recorded.
    ///
    /// Pending entries count even though they may resolve to nothing; settle
    /// first for a final answer.
    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Resolves every pending entry and returns the final messages in check order.
    ///
    /// Entries whose deferred check passed are removed. Afterwards every
    /// remaining entry is [`MessageEntry::Resolved`].
    #[instrument(skip(self), fields(field = %self.field, entries = self.messages.len()))]
    pub async fn settle(&mut self) -> Vec<String> {
        let outcomes = join_all(self.messages.iter().map(|entry| entry.resolve())).await;
        let messages: Vec<String> = outcomes.into_iter().flatten().collect();
        self.messages = messages
            .iter()
            .cloned()
            .map(MessageEntry::Resolved)
            .collect();
        messages
    }

    /// Consumes the rule and returns its final messages.
    pub async fn into_messages(mut self) -> Vec<String> {
        self.settle().await
    }
}
