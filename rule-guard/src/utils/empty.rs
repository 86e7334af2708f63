use crate::value::{Params, Value};

/// Returns true when a value counts as "not provided".
///
/// Absent values, empty lists and empty maps are empty. Every other value is
/// empty when its string form is blank after trimming, so `0` and `"0"` are
/// not empty while `"   "` is.
///
/// # Examples
///
/// ```rust
/// use rule_guard::utils::is_empty;
/// use rule_guard::Value;
///
/// assert!(is_empty(&Value::Absent));
/// assert!(is_empty(&Value::from("   ")));
/// assert!(!is_empty(&Value::from(0)));
/// assert!(!is_empty(&Value::from("0")));
/// ```
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Absent => true,
        Value::List(items) => items.is_empty(),
        Value::Map(map) => map.is_empty(),
        Value::Text(text) => text.trim().is_empty(),
        other => other.to_text().trim().is_empty(),
    }
}

/// Removes every entry whose value is empty per [`is_empty`].
///
/// The map is pruned in place and returned for chaining. Remaining entries
/// keep their relative order.
pub fn clean_object(params: &mut Params) -> &mut Params {
    params.retain(|_, value| !is_empty(value));
    params
}
