//! Write-through store for the correspondence table

pub mod core;
pub mod mappers;
pub mod table;

pub use self::core::{CorrespondenceStore, LoadMode};
pub use mappers::{fields_to_record, record_to_fields, FieldMap};
pub use table::{encoding_for_label, CsvTable, TablePersistence};
