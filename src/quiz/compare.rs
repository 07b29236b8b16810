//! Local answer comparator, used whenever the backend cannot give a verdict.

/// Largest absolute difference still counted as the same number.
pub const TOLERANCE: f64 = 0.01;

const CURRENCY_SYMBOLS: [char; 2] = ['$', '₹'];
const THOUSANDS_SEPARATOR: char = ',';

/// Strip whitespace, currency symbols and thousands separators.
pub fn normalize_numeric(answer: &str) -> String {
    answer
        .trim()
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c) && *c != THOUSANDS_SEPARATOR)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse an answer as a finite number after normalization.
pub fn parse_amount(answer: &str) -> Option<f64> {
    normalize_numeric(answer)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Whether `user` is equivalent to `correct`.
///
/// Two numbers match within [`TOLERANCE`]; otherwise the trimmed,
/// lower-cased originals must be identical.
pub fn answers_match(user: &str, correct: &str) -> bool {
    match (parse_amount(user), parse_amount(correct)) {
        (Some(u), Some(c)) => (u - c).abs() < TOLERANCE,
        _ => user.trim().to_lowercase() == correct.trim().to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_tolerance() {
        assert!(answers_match("80", "80.00"));
        assert!(answers_match("6.251", "6.25"));
        assert!(!answers_match("79.9", "80"));
        assert!(!answers_match("80.01", "80"));
    }

    #[test]
    fn currency_and_separators_are_ignored() {
        assert!(answers_match("$36", "36"));
        assert!(answers_match(" ₹1,200 ", "1200"));
        assert!(answers_match("480", "$ 480"));
        assert_eq!(normalize_numeric(" $1,234.50 "), "1234.50");
    }

    #[test]
    fn strings_compare_case_insensitively() {
        assert!(answers_match("Paris", "paris"));
        assert!(answers_match("  15 liters ", "15 LITERS"));
        assert!(!answers_match("15 liters", "15"));
        assert!(!answers_match("", "0"));
    }

    #[test]
    fn non_finite_values_are_not_numbers() {
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert!(answers_match("NaN", "nan"));
    }
}
