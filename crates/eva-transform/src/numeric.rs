//! Numeric and yes/no token parsing.

/// Parses a string as i64, returning None for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

fn token(value: &str) -> String {
    value.trim().trim_end_matches('.').trim_end().to_lowercase()
}

/// `y`, `yes` or `true`, ignoring case and trailing periods.
pub fn is_positive_token(value: &str) -> bool {
    matches!(token(value).as_str(), "y" | "yes" | "true")
}

/// `n`, `no` or `false`, ignoring case and trailing periods.
pub fn is_negative_token(value: &str) -> bool {
    matches!(token(value).as_str(), "n" | "no" | "false")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_integers_only() {
        assert_eq!(parse_i64(" 186 "), Some(186));
        assert_eq!(parse_i64("-4"), Some(-4));
        assert_eq!(parse_i64("186 people"), None);
        assert_eq!(parse_i64("1.5"), None);
        assert_eq!(parse_i64(""), None);
    }

    #[test]
    fn tokens_ignore_case_and_periods() {
        assert!(is_positive_token("Yes."));
        assert!(is_positive_token("TRUE"));
        assert!(is_negative_token(" n "));
        assert!(!is_positive_token("yes please"));
        assert!(!is_negative_token("1"));
    }
}
