//! Integration tests for chained rule evaluation.
//!
//! These exercise the public API only: building rules, mixing synchronous
//! and deferred checks, and reading messages before and after settlement.

use rule_guard::prelude::*;
use rule_guard::{add_rule, extend_templates};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_required_then_max_length() {
    let mut rule = Rule::new();
    rule.field("x")
        .value("toolong")
        .required()
        .unwrap()
        .max_length(3)
        .unwrap();

    assert_eq!(rule.messages().len(), 1);
    assert_eq!(rule.settle().await, vec!["Must have up to 3 characters."]);
}

#[tokio::test]
async fn test_sync_and_async_interleaving_keeps_check_order() {
    let mut rule = Rule::new();
    rule.field("code").value("ab");

    // Slowest deferred check first, fastest last.
    rule.custom(|| {
        CustomOutcome::pending(async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            Some("first".to_string())
        })
    })
    .min_length(3)
    .unwrap()
    .custom(|| {
        CustomOutcome::pending(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            None
        })
    })
    .custom(|| CustomOutcome::pending(async { Some("fourth".to_string()) }))
    .digit()
    .unwrap();

    // Before settlement only the synchronous messages are known.
    assert_eq!(
        rule.resolved_messages(),
        vec!["Must have at least 3 characters.", "Must be a digit."]
    );
    assert_eq!(rule.pending().len(), 3);

    let messages = rule.settle().await;
    assert_eq!(
        messages,
        vec![
            "first",
            "Must have at least 3 characters.",
            "fourth",
            "Must be a digit."
        ]
    );
    assert!(!rule.has_pending());
}

#[tokio::test]
async fn test_deferred_failure_degrades_to_error_template() {
    let mut rule = Rule::new();
    rule.field("nickname").value("bob");
    rule.custom(|| {
        CustomOutcome::deferred(async {
            Err::<Option<String>, _>(RuleError::Callback("directory offline".to_string()))
        })
    });

    assert_eq!(rule.into_messages().await, vec!["Error."]);
}

#[tokio::test]
async fn test_pending_is_lazy_until_settled() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut rule = Rule::new();
    rule.custom(move || {
        CustomOutcome::pending(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Some("checked".to_string())
        })
    });

    tokio::task::yield_now().await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let pending = rule.pending()[0].clone();
    assert_eq!(pending.resolve().await.as_deref(), Some("checked"));
    assert_eq!(rule.settle().await, vec!["checked"]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_checks_before_value_are_contract_violations() {
    let mut rule = Rule::new();
    rule.field("email");

    for result in [
        rule.required().map(|_| ()),
        rule.email().map(|_| ()),
        rule.between(1.0, 2.0).map(|_| ()),
    ] {
        let err = result.unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(err.to_string(), "Validator value not set for field 'email'");
    }

    // custom does not read the value
    rule.custom(|| "still allowed");
    assert_eq!(rule.resolved_messages(), vec!["still allowed"]);
}

#[test]
fn test_full_built_in_catalogue() {
    let mut rule = Rule::new();
    rule.value("abc");
    rule.float()
        .unwrap()
        .less_than(1.0)
        .unwrap()
        .length(2)
        .unwrap()
        .length_between(5, 8)
        .unwrap()
        .not_in(["abc", "def"])
        .unwrap()
        .matches("abd")
        .unwrap()
        .regex(r"^\d+$")
        .unwrap()
        .email()
        .unwrap()
        .url()
        .unwrap()
        .size(2)
        .unwrap();

    assert_eq!(
        rule.resolved_messages(),
        vec![
            "Must be a number.",
            "Must be a number.",
            "Length must be 2.",
            "Must have between 5 and 8 characters.",
            "Must not be abc or def.",
            "Not matched.",
            "Invalid format.",
            "Invalid email.",
            "Invalid url.",
        ]
    );
}

#[test]
fn test_numeric_bounds_with_numbers_and_text() {
    let mut rule = Rule::new();
    rule.value(10)
        .less_than_or_equal_to(10.0)
        .unwrap()
        .greater_than(10.0)
        .unwrap()
        .value("9.5kg")
        .less_than(9.0)
        .unwrap();

    assert_eq!(
        rule.resolved_messages(),
        vec!["Must be greater than 10.", "Must be less than 9."]
    );
}

#[test]
fn test_list_values() {
    let mut rule = Rule::new();
    rule.value(vec!["a", "b"])
        .size(3)
        .unwrap()
        .required()
        .unwrap();
    assert_eq!(rule.resolved_messages(), vec!["Size must be 3."]);

    let mut empty = Rule::new();
    empty
        .value(Vec::<String>::new())
        .size(3)
        .unwrap()
        .required()
        .unwrap();
    assert_eq!(empty.resolved_messages(), vec!["Required."]);
}

#[test]
fn test_registered_check_through_apply() {
    add_rule(
        "chain_test_divisible_by",
        RegisteredCheck::new("chain_test_divisible_by", |value: &Value, args: &[Value]| {
            let divisor = args.first().map(rule_guard::utils::to_number).unwrap_or(1.0);
            rule_guard::utils::to_number(value) % divisor == 0.0
        }),
    );
    extend_templates(&HashMap::from([(
        "chain_test_divisible_by".to_string(),
        "Must be divisible by {0}.".to_string(),
    )]));

    let mut rule = Rule::new();
    rule.value(7)
        .apply("chain_test_divisible_by", &[Value::from(7)])
        .unwrap()
        .apply("chain_test_divisible_by", &[Value::from(2)])
        .unwrap();
    assert_eq!(rule.resolved_messages(), vec!["Must be divisible by 2."]);
}

#[test]
fn test_custom_option_combiner() {
    let templates = Templates::default()
        .with_option_combiner(|options: &[Value]| {
            options
                .iter()
                .map(|o| format!("'{o}'"))
                .collect::<Vec<_>>()
                .join(" | ")
        });
    let mut rule = Rule::with_template_set(Arc::new(templates));
    rule.value("x").is_in(["a", "b"]).unwrap();
    assert_eq!(rule.resolved_messages(), vec!["Must be 'a' | 'b'."]);
}

#[test]
fn test_validator_entry_points_start_fresh_rules() {
    let mut first = Validator::value("");
    first.required().unwrap();
    assert_eq!(first.resolved_messages(), vec!["Required."]);

    let mut second = Validator::field("other");
    assert!(second.messages().is_empty());
    assert!(second.required().is_err());
}

#[test]
fn test_numbers_use_their_display_form() {
    let mut zero = Rule::new();
    zero.value(-0.0)
        .length(1)
        .unwrap()
        .regex(r"^0$")
        .unwrap()
        .integer()
        .unwrap();
    assert!(zero.resolved_messages().is_empty());

    let mut huge = Rule::new();
    huge.value(1e21).max_length(4).unwrap().digit().unwrap();
    assert_eq!(
        huge.resolved_messages(),
        vec!["Must have up to 4 characters.", "Must be a digit."]
    );
}

#[test]
fn test_url_host_must_be_ascii() {
    let mut rule = Rule::new();
    rule.value("http://exämple.com").url().unwrap();
    assert_eq!(rule.resolved_messages(), vec!["Invalid url."]);
}
