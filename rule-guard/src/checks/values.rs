//! Containment and equality checks.

use crate::templates::{keys, Templates};
use crate::utils::format;
use crate::value::Value;

/// Fails unless `value` equals one of `options`.
///
/// Equality is strict: the number `1` is not the text `"1"`. An empty option
/// set never matches, so it always fails.
pub(crate) fn check_in(options: &[Value], value: &Value, templates: &Templates) -> Option<String> {
    (!options.contains(value)).then(|| {
        format(
            templates.get(keys::IN),
            &[templates.combine_options(options)],
        )
    })
}

/// Fails when `value` equals one of `options`.
///
/// An empty option set also fails, mirroring `in`.
pub(crate) fn check_not_in(
    options: &[Value],
    value: &Value,
    templates: &Templates,
) -> Option<String> {
    (options.is_empty() || options.contains(value)).then(|| {
        format(
            templates.get(keys::NOT_IN),
            &[templates.combine_options(options)],
        )
    })
}

/// Fails when `value` is not strictly equal to `expected`.
pub(crate) fn check_match(
    expected: &Value,
    value: &Value,
    templates: &Templates,
) -> Option<String> {
    (value != expected).then(|| templates.get(keys::MATCH).to_string())
}
