//! Row mapping between stored table rows and records
//!
//! Table rows are field maps keyed by the catalogue's native column labels.
//! Blank text cells become the missing-value placeholder on the way in and
//! on the way out.

use crate::{
    error::{CatalogueError, Result},
    models::CorrespondenceRecord,
};
use outgoing_common::{
    is_blank, normalize_missing, LABEL_DATE, LABEL_EXTENT, LABEL_ID, LABEL_LANGUAGE,
    LABEL_NOTES_ON_DATE, LABEL_REFERENCE_CODE, LABEL_SCOPE_AND_CONTENT, LABEL_TITLE,
};
use std::collections::HashMap;

/// One table row: column label to cell text
pub type FieldMap = HashMap<String, String>;

/// Map a record to a table row
#[must_use]
pub fn record_to_fields(record: &CorrespondenceRecord) -> FieldMap {
    [
        (LABEL_REFERENCE_CODE, normalize_missing(&record.reference_code)),
        (LABEL_TITLE, normalize_missing(&record.title)),
        (
            LABEL_SCOPE_AND_CONTENT,
            normalize_missing(&record.scope_and_content),
        ),
        (LABEL_DATE, normalize_missing(&record.date_expression)),
        (LABEL_NOTES_ON_DATE, normalize_missing(&record.notes_on_date)),
        (LABEL_EXTENT, normalize_missing(&record.extent)),
        (LABEL_LANGUAGE, normalize_missing(&record.language)),
        (LABEL_ID, record.id.to_string()),
    ]
    .into_iter()
    .map(|(label, value)| (label.to_string(), value))
    .collect()
}

/// Map a table row to a record
///
/// `row` is the 1-based data row number, used in error messages.
///
/// # Errors
///
/// Returns `CatalogueError::CorruptTable` if the `ID` cell is missing or is not
/// a non-negative integer
pub fn fields_to_record(row: usize, fields: &FieldMap) -> Result<CorrespondenceRecord> {
    let text = |label: &str| normalize_missing(fields.get(label).map_or("", String::as_str));

    Ok(CorrespondenceRecord {
        reference_code: text(LABEL_REFERENCE_CODE),
        title: text(LABEL_TITLE),
        scope_and_content: text(LABEL_SCOPE_AND_CONTENT),
        date_expression: text(LABEL_DATE),
        notes_on_date: text(LABEL_NOTES_ON_DATE),
        extent: text(LABEL_EXTENT),
        language: text(LABEL_LANGUAGE),
        id: parse_id(row, fields.get(LABEL_ID).map(String::as_str))?,
    })
}

/// Parse an `ID` cell
///
/// Accepts plain integers and integral decimals such as `42.0`, which
/// spreadsheet tools write for numeric columns.
fn parse_id(row: usize, cell: Option<&str>) -> Result<u64> {
    let cell = match cell {
        Some(cell) if !is_blank(cell) => cell.trim(),
        _ => return Err(CatalogueError::corrupt_table(row, "missing ID")),
    };

    if let Ok(id) = cell.parse::<u64>() {
        return Ok(id);
    }

    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 => {
            format!("{value:.0}")
                .parse::<u64>()
                .map_err(|e| CatalogueError::corrupt_table(row, format!("invalid ID '{cell}': {e}")))
        }
        _ => Err(CatalogueError::corrupt_table(
            row,
            format!("invalid ID '{cell}': expected a non-negative integer"),
        )),
    }
}
