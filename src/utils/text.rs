// Text utils

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading decimal number, optionally signed, with optional exponent.
static NUMERIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|\d+\.?\d*(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?)")
        .expect("numeric prefix regex is valid")
});

/// Parses the longest numeric prefix of `raw` ("4.2", "-3", "1.5e2 pts").
///
/// Returns None when there is no number to read. Negative zero comes back as `0.0`.
pub fn parse_score(raw: &str) -> Option<f64> {
    let m = NUMERIC_PREFIX.find(raw.trim_start())?;
    let value = match m.as_str().trim_start_matches('+') {
        "Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        number => number.parse::<f64>().ok()?,
    };
    if value.is_nan() {
        None
    } else if value == 0.0 {
        Some(0.0)
    } else {
        Some(value)
    }
}

/// True for an empty, whitespace-only or placeholder title.
pub fn is_placeholder_title(title: &str, placeholders: &[String]) -> bool {
    title.trim().is_empty() || placeholders.iter().any(|p| p == title)
}

/// Substring test. `needle` is expected to be lowercased already when `case_sensitive` is off.
pub fn contains_query(haystack: &str, needle: &str, case_sensitive: bool) -> bool {
    if haystack.is_empty() {
        return false;
    }
    if case_sensitive {
        haystack.contains(needle)
    } else {
        haystack.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_plain_numbers() {
        assert_eq!(parse_score("4.2"), Some(4.2));
        assert_eq!(parse_score("-3"), Some(-3.0));
        assert_eq!(parse_score(" 7.5 "), Some(7.5));
        assert_eq!(parse_score(".5"), Some(0.5));
        assert_eq!(parse_score("+2"), Some(2.0));
        assert_eq!(parse_score("1e2"), Some(100.0));
    }

    #[test]
    fn test_parse_score_reads_numeric_prefix() {
        assert_eq!(parse_score("4.2 (avg)"), Some(4.2));
        assert_eq!(parse_score("3."), Some(3.0));
    }

    #[test]
    fn test_parse_score_rejects_non_numbers() {
        assert_eq!(parse_score(""), None);
        assert_eq!(parse_score("N/A"), None);
        assert_eq!(parse_score("abc1"), None);
        assert_eq!(parse_score("NaN"), None);
    }

    #[test]
    fn test_parse_score_negative_zero_is_zero() {
        let v = parse_score("-0").unwrap();
        assert_eq!(v, 0.0);
        assert!(v.is_sign_positive());
    }

    #[test]
    fn test_placeholder_titles() {
        let placeholders = vec!["N/A".to_string()];
        assert!(is_placeholder_title("", &placeholders));
        assert!(is_placeholder_title("   ", &placeholders));
        assert!(is_placeholder_title("N/A", &placeholders));
        assert!(!is_placeholder_title("n/a", &placeholders));
        assert!(!is_placeholder_title("Port deal", &placeholders));
    }

    #[test]
    fn test_contains_query() {
        assert!(contains_query("Port Deal", "port", false));
        assert!(!contains_query("Port Deal", "port", true));
        assert!(contains_query("Port Deal", "Port", true));
        assert!(!contains_query("", "", false));
    }
}
