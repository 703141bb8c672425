//! Validation of candidate records

pub mod dating;
pub mod language;
pub mod patterns;
pub mod record;

pub use dating::{parse as parse_date_expression, DateRange, Lifespan};
pub use language::{
    default_validator, BuiltinLanguageNames, ChainedLanguageNames, FileLanguageNames,
    LanguageNameSource, LanguageValidator,
};
pub use patterns::{check_extent, check_reference_code, is_extent, is_reference_code};
pub use record::{RecordSnapshot, RecordValidator};
