//! Error types for the correspondence catalogue

use thiserror::Error;

/// Result type alias for catalogue operations
pub type Result<T> = std::result::Result<T, CatalogueError>;

/// Main error type for catalogue operations
#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Field '{field}' value '{value}' does not match the expected format {expected}")]
    PatternMismatch {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid date expression '{expression}': {reason}")]
    DateFormat { expression: String, reason: String },

    #[error(
        "Date '{expression}' (interpreted as {start} - {end}) lies outside the lifespan {lifespan_start} - {lifespan_end}"
    )]
    DateRange {
        expression: String,
        start: String,
        end: String,
        lifespan_start: String,
        lifespan_end: String,
    },

    #[error("Unknown language '{name}'{}", .suggestion.as_ref().map(|s| format!(", did you mean '{s}'?")).unwrap_or_default())]
    UnknownLanguage {
        name: String,
        suggestion: Option<String>,
    },

    #[error("ID {id} already exists")]
    DuplicateIdentifier { id: u64 },

    #[error("Reference code '{code}' already exists (record ID {existing_id})")]
    DuplicateReferenceCode { code: String, existing_id: u64 },

    #[error("Correspondence not found: {id}")]
    NotFound { id: u64 },

    #[error("ID in path ({path_id}) does not match ID in payload ({payload_id})")]
    IdentifierMismatch { path_id: u64, payload_id: u64 },

    #[error("Failed to persist table: {message}")]
    Persistence { message: String },

    #[error("Corrupt table at row {row}: {message}")]
    CorruptTable { row: usize, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CatalogueError {
    /// Create a persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a corrupt-table error for a 1-based data row
    pub fn corrupt_table(row: usize, message: impl Into<String>) -> Self {
        Self::CorruptTable {
            row,
            message: message.into(),
        }
    }

    /// Whether the caller can fix the error by changing the submitted record
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::PatternMismatch { .. }
                | Self::DateFormat { .. }
                | Self::DateRange { .. }
                | Self::UnknownLanguage { .. }
                | Self::DuplicateIdentifier { .. }
                | Self::DuplicateReferenceCode { .. }
                | Self::IdentifierMismatch { .. }
                | Self::Serialization(_)
        )
    }

    /// Whether the error reports a missing record
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_from_std() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let error: CatalogueError = io_error.into();
        assert!(matches!(error, CatalogueError::Io(_)));
        assert!(!error.is_validation());
    }

    #[test]
    fn test_serialization_error_from_serde() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: CatalogueError = json_error.into();
        assert!(matches!(error, CatalogueError::Serialization(_)));
        assert!(error.is_validation());
    }

    #[test]
    fn test_pattern_mismatch_message() {
        let error = CatalogueError::PatternMismatch {
            field: "Signatur",
            value: "X-1".to_string(),
            expected: "B-I-<LETTERS>-<NUMBER>",
        };
        let message = error.to_string();
        assert!(message.contains("Signatur"));
        assert!(message.contains("X-1"));
        assert!(message.contains("B-I-<LETTERS>-<NUMBER>"));
    }

    #[test]
    fn test_date_range_message_names_both_intervals() {
        let error = CatalogueError::DateRange {
            expression: "1800".to_string(),
            start: "01.01.1800".to_string(),
            end: "31.12.1800".to_string(),
            lifespan_start: "06.06.1875".to_string(),
            lifespan_end: "12.08.1955".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("01.01.1800 - 31.12.1800"));
        assert!(message.contains("06.06.1875 - 12.08.1955"));
    }

    #[test]
    fn test_unknown_language_message_with_suggestion() {
        let error = CatalogueError::UnknownLanguage {
            name: "Deutch".to_string(),
            suggestion: Some("Deutsch".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "Unknown language 'Deutch', did you mean 'Deutsch'?"
        );
    }

    #[test]
    fn test_unknown_language_message_without_suggestion() {
        let error = CatalogueError::UnknownLanguage {
            name: "Klingonisch".to_string(),
            suggestion: None,
        };
        assert_eq!(error.to_string(), "Unknown language 'Klingonisch'");
    }

    #[test]
    fn test_duplicate_reference_code_names_existing_record() {
        let error = CatalogueError::DuplicateReferenceCode {
            code: "B-I-ALBER-3".to_string(),
            existing_id: 7,
        };
        assert!(error.to_string().contains("record ID 7"));
    }

    #[test]
    fn test_classification() {
        assert!(CatalogueError::DuplicateIdentifier { id: 1 }.is_validation());
        assert!(CatalogueError::IdentifierMismatch {
            path_id: 5,
            payload_id: 6
        }
        .is_validation());
        assert!(CatalogueError::NotFound { id: 1 }.is_not_found());
        assert!(!CatalogueError::NotFound { id: 1 }.is_validation());
        assert!(!CatalogueError::persistence("disk full").is_validation());
        assert!(!CatalogueError::configuration("bad").is_not_found());
    }

    #[test]
    fn test_helpers() {
        match CatalogueError::corrupt_table(3, "missing ID") {
            CatalogueError::CorruptTable { row, message } => {
                assert_eq!(row, 3);
                assert_eq!(message, "missing ID");
            }
            _ => panic!("Expected CorruptTable error"),
        }

        match CatalogueError::persistence("disk full".to_string()) {
            CatalogueError::Persistence { message } => assert_eq!(message, "disk full"),
            _ => panic!("Expected Persistence error"),
        }
    }
}
