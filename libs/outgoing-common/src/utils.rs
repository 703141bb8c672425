//! Utility functions shared by the catalogue crates

use crate::constants::{DISPLAY_DATE_FORMAT, MISSING_VALUE};
use chrono::NaiveDate;

/// Whether a field value is empty or consists of whitespace only
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Replace a blank field value with the missing-value placeholder
#[must_use]
pub fn normalize_missing(value: &str) -> String {
    if is_blank(value) {
        MISSING_VALUE.to_string()
    } else {
        value.to_string()
    }
}

/// Fold a name for case-insensitive comparison
///
/// Trims surrounding whitespace and lowercases with full Unicode case mapping,
/// so `"  Französisch "` and `"französisch"` fold to the same key.
#[must_use]
pub fn fold_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Format a date the way the catalogue displays it (`DD.MM.YYYY`)
#[must_use]
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n"));
        assert!(!is_blank(" a "));
    }

    #[test]
    fn test_normalize_missing() {
        assert_eq!(normalize_missing(""), MISSING_VALUE);
        assert_eq!(normalize_missing("  "), MISSING_VALUE);
        assert_eq!(normalize_missing("Zürich"), "Zürich");
        // Non-blank values are kept verbatim, including padding
        assert_eq!(normalize_missing(" x "), " x ");
    }

    #[test]
    fn test_fold_name() {
        assert_eq!(fold_name("  Deutsch "), "deutsch");
        assert_eq!(fold_name("FRANZÖSISCH"), "französisch");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(1904, 2, 29).unwrap();
        assert_eq!(format_date(&date), "29.02.1904");
    }
}
