//! Cell coercion helpers shared by ingestion and analysis.
//!
//! Board cells are free text. These helpers turn them into numbers, timestamps
//! and grouping labels, returning `None` instead of failing when a value does
//! not parse.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Label used for a categorical cell that is absent.
pub const UNKNOWN_LABEL: &str = "unknown";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// True when a cell carries no usable text.
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Parse a monetary amount.
///
/// Accepts plain decimal notation (surrounding whitespace ignored). Thousands
/// separators, currency symbols and non-finite spellings (`inf`, `NaN`) are
/// rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a date or timestamp.
///
/// RFC 3339 timestamps are converted to UTC; plain dates resolve to midnight.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Normalize a categorical label for grouping and lookup (trim + lower-case).
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalized label for an optional cell; absent cells group as [`UNKNOWN_LABEL`].
pub fn label_or_unknown(raw: Option<&str>) -> String {
    match raw {
        Some(v) => normalize_label(v),
        None => UNKNOWN_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn amounts_parse_plain_decimals_only() {
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount(" 250.5 "), Some(250.5));
        assert_eq!(parse_amount("-40"), Some(-40.0));
        assert_eq!(parse_amount("1,000"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("$100"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn dates_parse_common_board_formats() {
        let midnight = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        assert_eq!(parse_datetime("2024-02-01"), Some(midnight));
        assert_eq!(parse_datetime("2024/02/01"), Some(midnight));
        assert_eq!(parse_datetime("02/01/2024"), Some(midnight));
        assert_eq!(parse_datetime("2024-02-01T00:00:00Z"), Some(midnight));
        assert_eq!(parse_datetime("2024-02-01 00:00:00"), Some(midnight));
        assert_eq!(
            parse_datetime("2024-02-01T05:00:00+05:00"),
            Some(midnight)
        );
    }

    #[test]
    fn unparseable_dates_are_none() {
        assert_eq!(parse_datetime("next tuesday"), None);
        assert_eq!(parse_datetime("2024-13-01"), None);
        assert_eq!(parse_datetime("   "), None);
    }

    #[test]
    fn labels_normalize_and_absent_is_unknown() {
        assert_eq!(normalize_label("  Negotiation "), "negotiation");
        assert_eq!(label_or_unknown(Some("FinTech")), "fintech");
        assert_eq!(label_or_unknown(None), UNKNOWN_LABEL);
    }

    proptest! {
        /// Property: whatever text a board cell holds, a parsed amount is finite.
        #[test]
        fn parsed_amounts_are_always_finite(raw in ".*") {
            if let Some(v) = parse_amount(&raw) {
                prop_assert!(v.is_finite());
            }
        }
    }
}
