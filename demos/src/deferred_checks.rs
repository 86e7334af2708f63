//! Deferred checks: async custom callbacks and a remote `unique` check.
//!
//! The remote endpoint is simulated with `requester_fn`, so the example runs
//! offline. Swap in `ReqwestRequester` with an `HttpConfig` to hit a real API.

use rule_guard::logging::setup::{init_logging, LoggingConfig};
use rule_guard::prelude::*;
use serde_json::json;
use std::error::Error;
use std::time::Duration;

const TAKEN: &[&str] = &["admin", "root", "alice"];

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn Error>> {
    init_logging(LoggingConfig::development().with_json_format(true))?;

    let directory = requester_fn(|url, _params| async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let name = url.rsplit('/').next().unwrap_or_default().to_string();
        let exists = TAKEN.contains(&name.as_str());
        tracing::info!(%name, exists, "Directory lookup");
        Ok(HttpResponse::new(json!({ "exists": exists })))
    });

    for candidate in ["alice", "zoe", "x"] {
        let params = Params::from([("name".to_string(), Value::from(candidate))]);
        let mut rule = Rule::new().with_http_requester(directory.clone());
        rule.field("username")
            .value(candidate)
            .required()?
            .min_length(2)?
            .unique("users/{name}", params)?
            .custom(|| {
                CustomOutcome::deferred(async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    if candidate.starts_with('x') {
                        Err(RuleError::Callback("prefix lookup failed".into()))
                    } else {
                        Ok(None)
                    }
                })
            });

        println!(
            "{candidate}: {} resolved now, {} pending",
            rule.resolved_messages().len(),
            rule.pending().len()
        );
        let messages = rule.settle().await;
        println!("{candidate}: {messages:?}");
    }

    Ok(())
}
