//! Loose numeric coercion of form input.
//!
//! Form fields arrive as text, so numeric checks accept prefixes the way
//! browsers do: `parse_float("12px")` is `12`. The integer check additionally
//! compares against the whole-string conversion done by [`to_number`].

use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("Hard-coded regex pattern should be valid")
});

static DECIMAL_LITERAL: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .expect("Hard-coded regex pattern should be valid")
});

fn parse_signed_infinity(literal: &str) -> Option<f64> {
    match literal {
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

/// Parses the longest numeric prefix of `text` after leading whitespace.
///
/// Returns `None` when no numeric prefix exists.
///
/// ```rust
/// use rule_guard::utils::parse_float;
///
/// assert_eq!(parse_float(" 3.5kg"), Some(3.5));
/// assert_eq!(parse_float(".5"), Some(0.5));
/// assert_eq!(parse_float("abc"), None);
/// ```
pub fn parse_float(text: &str) -> Option<f64> {
    let literal = FLOAT_PREFIX.find(text.trim_start())?.as_str();
    parse_signed_infinity(literal).or_else(|| literal.parse::<f64>().ok())
}

/// Parses the leading integer of `text` after leading whitespace.
///
/// A `0x`/`0X` prefix switches to hexadecimal. Fractional parts and any
/// trailing garbage are ignored: `parse_int("2.9")` is `2`.
pub fn parse_int(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    let mut result: Option<f64> = None;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(radix) else {
            break;
        };
        result = Some(result.unwrap_or(0.0) * f64::from(radix) + f64::from(digit));
    }

    result.map(|n| if negative { -n } else { n })
}

fn text_to_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(infinity) = parse_signed_infinity(trimmed) {
        return infinity;
    }

    let radix_literal = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some((16, &trimmed[2..])),
        Some("0o") | Some("0O") => Some((8, &trimmed[2..])),
        Some("0b") | Some("0B") => Some((2, &trimmed[2..])),
        _ => None,
    };
    if let Some((radix, digits)) = radix_literal {
        if digits.is_empty() {
            return f64::NAN;
        }
        return digits.chars().try_fold(0.0, |acc, ch| {
            ch.to_digit(radix)
                .map(|digit| acc * f64::from(radix) + f64::from(digit))
        })
        .unwrap_or(f64::NAN);
    }

    if DECIMAL_LITERAL.is_match(trimmed) {
        trimmed.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Converts a whole value to a number, yielding NaN when it is not numeric.
///
/// Blank text converts to `0`, booleans to `1`/`0` and absent values to `0`.
/// Lists convert through their string form, maps are never numeric.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Absent => 0.0,
        Value::Bool(flag) => {
            if *flag {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(number) => *number,
        Value::Text(text) => text_to_number(text),
        Value::List(_) => text_to_number(&value.to_text()),
        Value::Map(_) => f64::NAN,
    }
}

/// Returns true when `candidate` is not usable as a number.
///
/// Stricter than a plain NaN test: blank and whitespace-only input is
/// rejected even though it would otherwise convert to `0`.
pub fn is_nan(candidate: &Value) -> bool {
    candidate.to_text().trim().is_empty() || to_number(candidate).is_nan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_float_prefixes() {
        assert_eq!(parse_float("12"), Some(12.0));
        assert_eq!(parse_float("  -1.5e3xyz"), Some(-1500.0));
        assert_eq!(parse_float("12abc"), Some(12.0));
        assert_eq!(parse_float("1e"), Some(1.0));
        assert_eq!(parse_float("5."), Some(5.0));
        assert_eq!(parse_float("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("   "), None);
        assert_eq!(parse_float("abc12"), None);
        assert_eq!(parse_float("."), None);
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("2"), Some(2.0));
        assert_eq!(parse_int("2.9"), Some(2.0));
        assert_eq!(parse_int(" -42px"), Some(-42.0));
        assert_eq!(parse_int("0x1A"), Some(26.0));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int(".5"), None);
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&Value::from("2.0")), 2.0);
        assert_eq!(to_number(&Value::from(" 7 ")), 7.0);
        assert_eq!(to_number(&Value::from("")), 0.0);
        assert_eq!(to_number(&Value::from("0x10")), 16.0);
        assert_eq!(to_number(&Value::from(true)), 1.0);
        assert_eq!(to_number(&Value::from(vec![5])), 5.0);
        assert!(to_number(&Value::from("12abc")).is_nan());
        assert!(to_number(&Value::from(vec![1, 2])).is_nan());
        assert!(to_number(&Value::Map(Default::default())).is_nan());
    }

    #[test]
    fn test_is_nan_rejects_blank() {
        assert!(is_nan(&Value::from("")));
        assert!(is_nan(&Value::from("  ")));
        assert!(is_nan(&Value::from("abc")));
        assert!(is_nan(&Value::Number(f64::NAN)));
        assert!(!is_nan(&Value::from("0")));
        assert!(!is_nan(&Value::from(3.5)));
    }
}
