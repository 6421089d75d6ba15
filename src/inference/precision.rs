//! Numeric detection and display-precision analysis.
//!
//! Floating-point values cannot tell how many decimals were *displayed* upstream, so precision is
//! only ever read off textual values: `"12.3450"` has 4 fractional digits, trailing zero included.

use std::collections::HashMap;

use crate::types::{Row, Value};

/// Outcome of [`analyze_precision`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    /// Count of characters after the decimal point (0 when unknown or absent).
    pub digits: usize,
    /// Whether the value was recognized as a number at all.
    pub is_numeric: bool,
}

impl Precision {
    const NOT_NUMERIC: Self = Self {
        digits: 0,
        is_numeric: false,
    };

    fn numeric(digits: usize) -> Self {
        Self {
            digits,
            is_numeric: true,
        }
    }
}

/// Determine whether `value` is numeric and, for text, how many fractional digits it shows.
///
/// Native numbers are numeric with unknowable precision (reported as 0).
pub fn analyze_precision(value: &Value) -> Precision {
    match value {
        Value::Number(_) => Precision::numeric(0),
        Value::Text(s) => analyze_text(s),
        _ => Precision::NOT_NUMERIC,
    }
}

fn analyze_text(raw: &str) -> Precision {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Precision::NOT_NUMERIC;
    }
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed).trim();
    let unsigned = unsigned.strip_prefix('-').unwrap_or(unsigned);
    if unsigned.is_empty() {
        return Precision::NOT_NUMERIC;
    }

    if unsigned.contains(['e', 'E']) {
        return if trimmed.parse::<f64>().is_ok() {
            Precision::numeric(0)
        } else {
            Precision::NOT_NUMERIC
        };
    }

    if let Some((_, fraction)) = unsigned.split_once('.') {
        return Precision::numeric(fraction.len());
    }

    if trimmed.parse::<f64>().is_ok() {
        Precision::numeric(0)
    } else {
        Precision::NOT_NUMERIC
    }
}

/// Fractional digits of one coordinate token, ignoring a leading sign.
pub fn component_digits(token: &str) -> usize {
    let trimmed = token.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let unsigned = unsigned.strip_prefix('-').unwrap_or(unsigned);
    unsigned
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len())
}

/// Maximum fractional digits per column key over every numeric cell in `rows`.
///
/// Keys whose values were never numeric are absent from the result.
pub fn max_fractional_digits(rows: &[Row]) -> HashMap<String, usize> {
    let mut out: HashMap<String, usize> = HashMap::new();
    for row in rows {
        for (key, value) in row {
            let precision = analyze_precision(value);
            if !precision.is_numeric {
                continue;
            }
            out.entry(key.clone())
                .and_modify(|d| *d = (*d).max(precision.digits))
                .or_insert(precision.digits);
        }
    }
    out
}

/// Numeric test used by classification: surrounding whitespace and `,` thousands separators are
/// tolerated.
pub fn is_numeric_value(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::Text(s) => {
            let trimmed = s.trim();
            !trimmed.is_empty() && trimmed.replace(',', "").parse::<f64>().is_ok()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::text(s)
    }

    #[test]
    fn counts_trailing_zeros_as_displayed_digits() {
        assert_eq!(analyze_precision(&text("12.3450")), Precision::numeric(4));
        assert_eq!(analyze_precision(&text("9.8")), Precision::numeric(1));
        assert_eq!(analyze_precision(&text("-7.890")), Precision::numeric(3));
        assert_eq!(analyze_precision(&text("  3.14159 ")), Precision::numeric(5));
        assert_eq!(analyze_precision(&text("+2.50")), Precision::numeric(2));
    }

    #[test]
    fn integers_exponents_and_native_numbers_report_zero_digits() {
        assert_eq!(analyze_precision(&text("123")), Precision::numeric(0));
        assert_eq!(analyze_precision(&text("1e-5")), Precision::numeric(0));
        assert_eq!(analyze_precision(&Value::Number(1.25)), Precision::numeric(0));
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert!(!analyze_precision(&text("xyz")).is_numeric);
        assert!(!analyze_precision(&text("")).is_numeric);
        assert!(!analyze_precision(&text("-")).is_numeric);
        assert!(!analyze_precision(&text("+ ")).is_numeric);
        assert!(!analyze_precision(&text("2e")).is_numeric);
        assert!(!analyze_precision(&Value::Bool(true)).is_numeric);
        assert!(!analyze_precision(&Value::Null).is_numeric);
    }

    #[test]
    fn column_maximum_spans_all_rows() {
        let mut r1 = Row::new();
        r1.insert("int_as_string".to_string(), text("42"));
        r1.insert("float_as_string".to_string(), text("12.3450"));
        r1.insert("mixed".to_string(), text("7.1"));
        let mut r2 = Row::new();
        r2.insert("float_as_string".to_string(), text("9.8"));
        r2.insert("mixed".to_string(), text("7.1234"));
        r2.insert("ignored".to_string(), text("abc"));

        let got = max_fractional_digits(&[r1, r2]);
        assert_eq!(got.get("int_as_string"), Some(&0));
        assert_eq!(got.get("float_as_string"), Some(&4));
        assert_eq!(got.get("mixed"), Some(&4));
        assert!(!got.contains_key("ignored"));
    }

    #[test]
    fn component_digits_ignore_sign() {
        assert_eq!(component_digits("-0.1275"), 4);
        assert_eq!(component_digits("+51.50"), 2);
        assert_eq!(component_digits("10"), 0);
    }

    #[test]
    fn classification_numeric_test_tolerates_thousands_separators() {
        assert!(is_numeric_value(&text("1,234.5")));
        assert!(is_numeric_value(&Value::Number(3.0)));
        assert!(!is_numeric_value(&text(" ")));
        assert!(!is_numeric_value(&text("12 apples")));
    }
}
