use crate::value::Params;
use regex::{NoExpand, RegexBuilder};

/// Substitutes `{key}` placeholders in `url` with values from `params`.
///
/// Keys are visited in map order. A key whose placeholder is found
/// (case-insensitively) replaces the first occurrence and is removed from
/// `params`, so it is not sent again as a query parameter. Keys without a
/// placeholder stay in `params`.
///
/// ```rust
/// use rule_guard::utils::replace_params_in_url;
/// use rule_guard::{Params, Value};
///
/// let mut params = Params::new();
/// params.insert("id".to_string(), Value::from(5));
/// params.insert("name".to_string(), Value::from("a"));
///
/// assert_eq!(replace_params_in_url("api/user/{id}", &mut params), "api/user/5");
/// assert_eq!(params.len(), 1);
/// assert!(params.contains_key("name"));
/// ```
pub fn replace_params_in_url(url: &str, params: &mut Params) -> String {
    let mut url = url.to_string();
    if url.trim().is_empty() {
        return url;
    }

    let keys: Vec<String> = params.keys().cloned().collect();
    for key in keys {
        let placeholder = regex::escape(&format!("{{{key}}}"));
        let Ok(pattern) = RegexBuilder::new(&placeholder)
            .case_insensitive(true)
            .build()
        else {
            continue;
        };
        if !pattern.is_match(&url) {
            continue;
        }
        if let Some(value) = params.shift_remove(&key) {
            url = pattern
                .replace(&url, NoExpand(&value.to_text()))
                .into_owned();
        }
    }

    url
}
