//! Amount parsing for vendor number formats.

use std::fmt;

/// A non-empty cell that is not a number after currency clean-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAmount(pub String);

impl fmt::Display for InvalidAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a number: {:?}", self.0)
    }
}

impl std::error::Error for InvalidAmount {}

const CURRENCY_SYMBOLS: [char; 3] = ['£', '$', '€'];

/// Parses a vendor amount such as `£1,234.50`, `(12.00)` or `3`.
///
/// Blank cells and the spreadsheet null spellings (`nan`, `NaN`, `null`) are
/// `Ok(None)`. Accounting parentheses mean a negative value.
///
/// ```
/// use salesprep_common::parse_amount;
///
/// assert_eq!(parse_amount("£1,234.50"), Ok(Some(1234.5)));
/// assert_eq!(parse_amount("(12)"), Ok(Some(-12.0)));
/// assert_eq!(parse_amount(""), Ok(None));
/// assert!(parse_amount("twelve").is_err());
/// ```
pub fn parse_amount(value: &str) -> Result<Option<f64>, InvalidAmount> {
    let trimmed = value.trim();
    if is_null_spelling(trimmed) {
        return Ok(None);
    }
    let (negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };
    let cleaned: String = body
        .chars()
        .filter(|ch| !CURRENCY_SYMBOLS.contains(ch) && *ch != ',' && !ch.is_whitespace())
        .collect();
    let parsed = cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InvalidAmount(value.to_string()))?;
    Ok(Some(if negative { -parsed } else { parsed }))
}

/// `numerator / denominator`, or `None` when either side is missing, the
/// denominator is zero or the result is not finite.
pub fn safe_ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (numerator, denominator) = (numerator?, denominator?);
    if denominator == 0.0 {
        return None;
    }
    let ratio = numerator / denominator;
    ratio.is_finite().then_some(ratio)
}

fn is_null_spelling(value: &str) -> bool {
    value.is_empty()
        || value.eq_ignore_ascii_case("nan")
        || value.eq_ignore_ascii_case("null")
        || value.eq_ignore_ascii_case("none")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_currency_and_thousands() {
        assert_eq!(parse_amount("$ 2,000"), Ok(Some(2000.0)));
        assert_eq!(parse_amount("€0.99"), Ok(Some(0.99)));
        assert_eq!(parse_amount("-4.5"), Ok(Some(-4.5)));
        assert_eq!(parse_amount("(£1,000.25)"), Ok(Some(-1000.25)));
    }

    #[test]
    fn null_spellings_are_missing() {
        assert_eq!(parse_amount("  "), Ok(None));
        assert_eq!(parse_amount("NaN"), Ok(None));
        assert_eq!(parse_amount("null"), Ok(None));
    }

    #[test]
    fn rejects_text_and_infinities() {
        assert_eq!(parse_amount("N/A"), Err(InvalidAmount("N/A".to_string())));
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn ratio_uses_null_sentinel() {
        assert_eq!(safe_ratio(Some(10.0), Some(4.0)), Some(2.5));
        assert_eq!(safe_ratio(Some(10.0), Some(0.0)), None);
        assert_eq!(safe_ratio(None, Some(1.0)), None);
        assert_eq!(safe_ratio(Some(1.0), None), None);
        assert_eq!(safe_ratio(Some(0.0), Some(0.0)), None);
    }
}
