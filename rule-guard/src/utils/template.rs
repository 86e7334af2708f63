use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt::Display;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\{(\d+)\}").expect("Hard-coded regex pattern should be valid")
});

/// Substitutes `{0}`, `{1}`, ... in `template` with the matching argument.
///
/// Placeholders without a matching argument are kept verbatim.
///
/// ```rust
/// use rule_guard::utils::format;
///
/// assert_eq!(format("Must be between {0} and {1}.", &[1, 10]), "Must be between 1 and 10.");
/// assert_eq!(format("{0} and {1}", &["a"]), "a and {1}");
/// ```
pub fn format<T: Display>(template: &str, args: &[T]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| args.get(index))
                .map_or_else(|| caps[0].to_string(), ToString::to_string)
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_missing_argument_is_left_verbatim() {
        assert_eq!(format("{0} and {1}", &["a"]), "a and {1}");
        assert_eq!(format("{3}", &["a"]), "{3}");
    }

    #[test]
    fn test_repeated_and_unordered_placeholders() {
        assert_eq!(format("{1}-{0}-{1}", &["a", "b"]), "b-a-b");
    }

    #[test]
    fn test_non_numeric_braces_untouched() {
        assert_eq!(format("{name} {0}", &["x"]), "{name} x");
        assert_eq!(format("no placeholders", &[] as &[&str]), "no placeholders");
    }

    #[test]
    fn test_values_render_as_text() {
        assert_eq!(
            format("Must be less than {0}.", &[Value::from(10.0)]),
            "Must be less than 10."
        );
    }
}
