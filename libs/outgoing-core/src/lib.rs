//! Outgoing Core - validation engine and write-through store for the
//! catalogue of Thomas Mann's outgoing correspondence
//!
//! Every letter in the catalogue is a flat record with a reference code,
//! descriptive text fields, a partial-precision date expression, a physical
//! extent, a language name and a numeric identifier. This crate checks
//! candidate records against the catalogue's rules and keeps the table
//! consistent on disk.
//!
//! # Features
//!
//! - **Date expressions**: `DD.MM.YYYY`, `MM.YYYY` and `YYYY`, optionally
//!   prefixed with `ca.`, resolved to calendar intervals and checked against
//!   the correspondent's lifespan
//! - **Language names**: display names of the configured locale, looked up
//!   case-insensitively with spelling suggestions
//! - **Ordered rules**: the first violated rule is the one reported
//! - **Write-through store**: every mutation is persisted before it returns
//!   and undone in memory if the write fails
//! - **Delimited tables**: `;`-separated, Latin-1 encoded, replaced atomically
//!
//! # Quick Start
//!
//! ```no_run
//! use outgoing_core::{CatalogueConfig, CatalogueError, CorrespondenceStore};
//!
//! # fn example() -> Result<(), CatalogueError> {
//! let config = CatalogueConfig::for_table("/data/outgoing.csv");
//! let store = CorrespondenceStore::open(&config)?;
//!
//! let letter = store.get(42)?;
//! println!("{}: {}", letter.reference_code, letter.title);
//!
//! let removed = store.delete(42)?;
//! println!("Removed {}", removed.reference_code);
//! # Ok(())
//! # }
//! ```
//!
//! # Crate Features
//!
//! - `test-utils`: Enable test utilities (for testing only)

pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::CatalogueConfig;
pub use error::{CatalogueError, Result};
pub use models::{CorrespondenceRecord, MutationResponse, ValidatedRecord};
pub use store::{CorrespondenceStore, CsvTable, FieldMap, LoadMode, TablePersistence};
pub use validation::{
    default_validator, parse_date_expression, DateRange, LanguageNameSource, LanguageValidator,
    Lifespan, RecordSnapshot, RecordValidator,
};

/// Re-export common types
pub use outgoing_common::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_reexports() {
        let range = parse_date_expression("ca. 1920").unwrap();
        assert!(range.approximate);
        assert_eq!(FIELD_LABELS.len(), 8);
        assert!(default_validator().is_known("Deutsch").unwrap());
    }
}
