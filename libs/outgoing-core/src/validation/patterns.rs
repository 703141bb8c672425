//! Fixed grammars for reference codes and physical extents

use crate::error::{CatalogueError, Result};
use once_cell::sync::Lazy;
use outgoing_common::{LABEL_EXTENT, LABEL_REFERENCE_CODE};
use regex::Regex;

/// Human-readable grammar of a reference code
pub const REFERENCE_CODE_FORMAT: &str = "B-I-<UPPERCASE LETTERS>-<NUMBER>[.<NUMBER>], e.g. 'B-I-ALBER-3'";

/// Human-readable grammar of an extent
pub const EXTENT_FORMAT: &str =
    "<NUMBER> Bl./<NUMBER> S.[ + <NUMBER> Bl./<NUMBER> S.]..., e.g. '1 Bl./2 S.'";

static REFERENCE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^B-I-[A-Z]+-\d+(\.\d+)?$").expect("valid regex"));

static EXTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+ Bl\./\d+ S\.( \+ \d+ Bl\./\d+ S\.)*$").expect("valid regex")
});

/// Whether a value is a well-formed reference code
#[must_use]
pub fn is_reference_code(value: &str) -> bool {
    REFERENCE_CODE.is_match(value)
}

/// Whether a value is a well-formed extent
#[must_use]
pub fn is_extent(value: &str) -> bool {
    EXTENT.is_match(value)
}

/// Check a reference code against its grammar
///
/// # Errors
/// Returns `CatalogueError::PatternMismatch` naming the field and the grammar
pub fn check_reference_code(value: &str) -> Result<()> {
    if is_reference_code(value) {
        return Ok(());
    }
    Err(CatalogueError::PatternMismatch {
        field: LABEL_REFERENCE_CODE,
        value: value.to_string(),
        expected: REFERENCE_CODE_FORMAT,
    })
}

/// Check an extent against its grammar
///
/// # Errors
/// Returns `CatalogueError::PatternMismatch` naming the field and the grammar
pub fn check_extent(value: &str) -> Result<()> {
    if is_extent(value) {
        return Ok(());
    }
    Err(CatalogueError::PatternMismatch {
        field: LABEL_EXTENT,
        value: value.to_string(),
        expected: EXTENT_FORMAT,
    })
}
