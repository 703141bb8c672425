//! Parsing of historical date expressions into calendar intervals
//!
//! A date expression names a day, a month or a year, optionally prefixed
//! with the approximation marker `ca.`:
//!
//! | Expression | Interval |
//! |---|---|
//! | `DD.MM.YYYY` | that day |
//! | `MM.YYYY` | first to last day of the month |
//! | `YYYY` | 1 January to 31 December |
//!
//! The interval must overlap the author's [`Lifespan`].

use crate::error::{CatalogueError, Result};
use chrono::{Datelike, NaiveDate};
use outgoing_common::{format_date, APPROXIMATE_MARKER, LIFESPAN_END, LIFESPAN_START};
use serde::{Deserialize, Serialize};

/// Closed calendar interval denoted by a date expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Whether the expression carried the approximation marker
    pub approximate: bool,
}

impl DateRange {
    /// Whether the two closed intervals share at least one day
    #[must_use]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= end && self.end >= start
    }

    /// Whether the expression denotes a single day
    #[must_use]
    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }
}

/// Interval within which every letter must have been written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifespan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Lifespan {
    /// Create a lifespan from its bounds
    ///
    /// # Errors
    /// Returns `CatalogueError::Configuration` if `start` is after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CatalogueError::configuration(format!(
                "lifespan start {} is after its end {}",
                format_date(&start),
                format_date(&end)
            )));
        }
        Ok(Self { start, end })
    }

    /// Check that a parsed interval overlaps the lifespan
    ///
    /// # Errors
    /// Returns `CatalogueError::DateRange` naming both intervals if they are disjoint
    pub fn check(&self, expression: &str, range: &DateRange) -> Result<()> {
        if range.overlaps(self.start, self.end) {
            return Ok(());
        }
        Err(CatalogueError::DateRange {
            expression: expression.to_string(),
            start: format_date(&range.start),
            end: format_date(&range.end),
            lifespan_start: format_date(&self.start),
            lifespan_end: format_date(&self.end),
        })
    }

    /// Parse an expression and check it against the lifespan
    ///
    /// # Errors
    /// Returns `CatalogueError::DateFormat` or `CatalogueError::DateRange`
    pub fn parse_within(&self, expression: &str) -> Result<DateRange> {
        let range = parse(expression)?;
        self.check(expression, &range)?;
        Ok(range)
    }
}

impl Default for Lifespan {
    fn default() -> Self {
        let (sy, sm, sd) = LIFESPAN_START;
        let (ey, em, ed) = LIFESPAN_END;
        Self {
            start: NaiveDate::from_ymd_opt(sy, sm, sd).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(ey, em, ed).unwrap_or(NaiveDate::MAX),
        }
    }
}

/// Parse a date expression into the interval it denotes
///
/// # Errors
/// Returns `CatalogueError::DateFormat` if the expression has the wrong number
/// of components, a component of the wrong width or with non-digits, or names
/// a day that does not exist (e.g. `29.02.1900`).
pub fn parse(expression: &str) -> Result<DateRange> {
    let trimmed = expression.trim();
    let (body, approximate) = match trimmed.strip_prefix(APPROXIMATE_MARKER) {
        Some(rest) => (rest.trim_start(), true),
        None => (trimmed, false),
    };

    let parts: Vec<&str> = body.split('.').collect();
    let (start, end) = match parts.as_slice() {
        [day, month, year] => {
            let date = day_of(
                expression,
                number(expression, year, 4, "year")?,
                number(expression, month, 2, "month")?,
                number(expression, day, 2, "day")?,
            )?;
            (date, date)
        }
        [month, year] => {
            let year = number(expression, year, 4, "year")?;
            let month = number(expression, month, 2, "month")?;
            let first = day_of(expression, year, month, 1)?;
            (first, last_day_of_month(expression, first)?)
        }
        [year] => {
            let year = number(expression, year, 4, "year")?;
            (
                day_of(expression, year, 1, 1)?,
                day_of(expression, year, 12, 31)?,
            )
        }
        _ => {
            return Err(format_error(
                expression,
                format!("expected 1 to 3 components, found {}", parts.len()),
            ))
        }
    };

    Ok(DateRange {
        start,
        end,
        approximate,
    })
}

fn number(expression: &str, component: &str, width: usize, name: &str) -> Result<u32> {
    if component.len() != width || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format_error(
            expression,
            format!("{name} must be {width} digits, found '{component}'"),
        ));
    }
    component
        .parse()
        .map_err(|e| format_error(expression, format!("invalid {name} '{component}': {e}")))
}

fn day_of(expression: &str, year: u32, month: u32, day: u32) -> Result<NaiveDate> {
    i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, month, day))
        .ok_or_else(|| {
            format_error(
                expression,
                format!("{day:02}.{month:02}.{year:04} is not a calendar date"),
            )
        })
}

fn last_day_of_month(expression: &str, first: NaiveDate) -> Result<NaiveDate> {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| format_error(expression, "month end is out of range"))
}

fn format_error(expression: &str, reason: impl Into<String>) -> CatalogueError {
    CatalogueError::DateFormat {
        expression: expression.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_single_day() {
        let range = parse("14.03.1921").unwrap();
        assert_eq!(range.start, date(1921, 3, 14));
        assert_eq!(range.end, date(1921, 3, 14));
        assert!(range.is_single_day());
        assert!(!range.approximate);
    }

    #[test]
    fn test_parse_leap_day() {
        let range = parse("29.02.1904").unwrap();
        assert_eq!(range.start, date(1904, 2, 29));
        assert_eq!(range.end, date(1904, 2, 29));
    }

    #[test]
    fn test_parse_leap_day_in_non_leap_century() {
        let result = parse("29.02.1900");
        assert!(matches!(result, Err(CatalogueError::DateFormat { .. })));
    }

    #[test]
    fn test_parse_month() {
        let range = parse("06.1875").unwrap();
        assert_eq!(range.start, date(1875, 6, 1));
        assert_eq!(range.end, date(1875, 6, 30));
    }

    #[test]
    fn test_parse_february_lengths() {
        assert_eq!(parse("02.1904").unwrap().end, date(1904, 2, 29));
        assert_eq!(parse("02.1900").unwrap().end, date(1900, 2, 28));
        assert_eq!(parse("02.2000").unwrap().end, date(2000, 2, 29));
    }

    #[test]
    fn test_parse_december_rolls_into_next_year() {
        let range = parse("12.1930").unwrap();
        assert_eq!(range.start, date(1930, 12, 1));
        assert_eq!(range.end, date(1930, 12, 31));
    }

    #[test]
    fn test_parse_year() {
        let range = parse("1929").unwrap();
        assert_eq!(range.start, date(1929, 1, 1));
        assert_eq!(range.end, date(1929, 12, 31));
    }

    #[test]
    fn test_parse_approximate_marker() {
        let range = parse("ca. 1933").unwrap();
        assert!(range.approximate);
        assert_eq!(range.start, date(1933, 1, 1));

        let range = parse("ca.05.1940").unwrap();
        assert!(range.approximate);
        assert_eq!(range.end, date(1940, 5, 31));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse("  1920 ").unwrap().start, date(1920, 1, 1));
    }

    #[test]
    fn test_parse_rejects_malformed_expressions() {
        for expression in [
            "",
            "ca.",
            "1.1.1900",
            "01.1.1900",
            "01.01.19",
            "01.01.1900.1",
            "aa.01.1900",
            "13.1900",
            "00.1900",
            "32.01.1900",
            "1900-01-01",
            "+900",
            "circa 1900",
        ] {
            let result = parse(expression);
            assert!(
                matches!(result, Err(CatalogueError::DateFormat { .. })),
                "expected DateFormat for {expression:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn test_lifespan_default_bounds() {
        let lifespan = Lifespan::default();
        assert_eq!(lifespan.start, date(1875, 6, 6));
        assert_eq!(lifespan.end, date(1955, 8, 12));
    }

    #[test]
    fn test_lifespan_rejects_year_before_birth() {
        let result = Lifespan::default().parse_within("1800");
        match result {
            Err(CatalogueError::DateRange {
                start,
                end,
                lifespan_start,
                lifespan_end,
                ..
            }) => {
                assert_eq!(start, "01.01.1800");
                assert_eq!(end, "31.12.1800");
                assert_eq!(lifespan_start, "06.06.1875");
                assert_eq!(lifespan_end, "12.08.1955");
            }
            other => panic!("Expected DateRange error, got {other:?}"),
        }
    }

    #[test]
    fn test_lifespan_boundaries() {
        let lifespan = Lifespan::default();
        assert!(lifespan.parse_within("06.1875").is_ok());
        assert!(lifespan.parse_within("06.06.1875").is_ok());
        assert!(lifespan.parse_within("05.06.1875").is_err());
        assert!(lifespan.parse_within("12.08.1955").is_ok());
        assert!(lifespan.parse_within("13.08.1955").is_err());
        assert!(lifespan.parse_within("1955").is_ok());
        assert!(lifespan.parse_within("1956").is_err());
        assert!(lifespan.parse_within("05.1875").is_err());
    }

    #[test]
    fn test_lifespan_new_rejects_inverted_bounds() {
        let result = Lifespan::new(date(1955, 1, 1), date(1875, 1, 1));
        assert!(matches!(result, Err(CatalogueError::Configuration { .. })));
    }

    proptest! {
        #[test]
        fn prop_every_day_parses_to_itself(y in 1876i32..1955, m in 1u32..=12, d in 1u32..=28) {
            let expression = format!("{d:02}.{m:02}.{y:04}");
            let range = Lifespan::default().parse_within(&expression).unwrap();
            prop_assert_eq!(range.start, date(y, m, d));
            prop_assert!(range.is_single_day());
        }

        #[test]
        fn prop_month_covers_whole_month(y in 1000i32..3000, m in 1u32..=12) {
            let range = parse(&format!("{m:02}.{y:04}")).unwrap();
            prop_assert_eq!(range.start.day(), 1);
            prop_assert_eq!(range.end.month(), m);
            let next = range.end.succ_opt().unwrap();
            prop_assert_eq!(next.day(), 1);
            prop_assert_ne!(next.month(), m);
        }

        #[test]
        fn prop_parse_never_panics(s in "\\PC{0,16}") {
            let _ = parse(&s);
        }
    }
}
