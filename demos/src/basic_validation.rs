//! Basic rule-guard example: a small sign-up form validated field by field.
//!
//! Run with `cargo run -p rule-guard-demos --example basic_validation`.

use rule_guard::logging::setup::{init_logging, LoggingConfig};
use rule_guard::prelude::*;
use std::collections::HashMap;
use std::error::Error;

struct SignUp {
    username: &'static str,
    email: &'static str,
    age: &'static str,
    password: &'static str,
    confirmation: &'static str,
    plan: &'static str,
}

fn passwords_match(form: &SignUp) -> Option<&'static str> {
    (form.password != form.confirmation).then_some("Passwords do not match.")
}

fn validate(form: &SignUp) -> rule_guard::Result<Vec<Rule>> {
    let mut username = Validator::field("username");
    username
        .value(form.username)
        .required()?
        .length_between(3, 16)?
        .regex(r"^[a-z0-9_]+$")?;

    let mut email = Validator::field("email");
    email.value(form.email).required()?.email()?;

    let mut age = Validator::field("age");
    age.value(form.age).integer()?.between(13.0, 120.0)?;

    let mut password = Validator::field("password");
    password
        .value(form.password)
        .required()?
        .min_length(8)?
        .custom_with(form, passwords_match);

    let mut plan = Validator::field("plan");
    plan.value(form.plan).is_in(["free", "team", "enterprise"])?;

    Ok(vec![username, email, age, password, plan])
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    init_logging(LoggingConfig::development())?;

    println!("rule-guard basic validation example\n");

    let mut overrides = HashMap::new();
    overrides.insert(
        "required".to_string(),
        "This field is required.".to_string(),
    );
    rule_guard::extend_templates(&overrides);

    let form = SignUp {
        username: "Bob Smith",
        email: "bob@example",
        age: "12.5",
        password: "hunter2",
        confirmation: "hunter3",
        plan: "",
    };

    for rule in validate(&form)? {
        let field = rule.field_name().to_string();
        let messages = rule.into_messages().await;
        if messages.is_empty() {
            println!("  {field}: ok");
        } else {
            println!("  {field}:");
            for message in messages {
                println!("    - {message}");
            }
        }
    }

    Ok(())
}
