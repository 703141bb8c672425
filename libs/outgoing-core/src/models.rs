//! Data models for catalogue entries

use crate::validation::dating::DateRange;
use outgoing_common::normalize_missing;
use serde::{Deserialize, Serialize};

/// One letter in the catalogue of outgoing correspondence
///
/// Serialized with the catalogue's native column labels. The English field
/// names are accepted as aliases when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrespondenceRecord {
    /// Catalogue signature, e.g. `B-I-ALBER-3`
    #[serde(rename = "Signatur", alias = "reference_code")]
    pub reference_code: String,
    /// Title of the letter
    #[serde(rename = "Titel", alias = "title")]
    pub title: String,
    /// Form and content description
    #[serde(rename = "Form und Inhalt", alias = "scope_and_content")]
    pub scope_and_content: String,
    /// Date or date range, e.g. `ca. 06.1921`
    #[serde(rename = "Entstehungszeitraum", alias = "date", alias = "date_expression")]
    pub date_expression: String,
    /// Remarks on the dating
    #[serde(rename = "Bemerkungen zur Datierung", alias = "notes_on_date")]
    pub notes_on_date: String,
    /// Physical extent, e.g. `2 Bl./3 S.`
    #[serde(rename = "Bemerkungen zum Umfang", alias = "extent")]
    pub extent: String,
    /// Language display name
    #[serde(rename = "Sprachen", alias = "language")]
    pub language: String,
    /// Numeric identifier
    #[serde(rename = "ID", alias = "id")]
    pub id: u64,
}

impl CorrespondenceRecord {
    /// Copy of the record with every blank text field replaced by the placeholder
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            reference_code: normalize_missing(&self.reference_code),
            title: normalize_missing(&self.title),
            scope_and_content: normalize_missing(&self.scope_and_content),
            date_expression: normalize_missing(&self.date_expression),
            notes_on_date: normalize_missing(&self.notes_on_date),
            extent: normalize_missing(&self.extent),
            language: normalize_missing(&self.language),
            id: self.id,
        }
    }
}

/// A candidate that passed every validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    /// The candidate with the language trimmed, not yet normalized
    pub record: CorrespondenceRecord,
    /// Interval denoted by the date expression
    pub dating: DateRange,
}

impl ValidatedRecord {
    /// The record as it is stored: blank fields replaced by the placeholder
    #[must_use]
    pub fn into_stored(self) -> CorrespondenceRecord {
        self.record.normalized()
    }
}

/// Body returned by mutating service operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub message: String,
    pub correspondence: CorrespondenceRecord,
}

impl MutationResponse {
    #[must_use]
    pub fn new(message: impl Into<String>, correspondence: CorrespondenceRecord) -> Self {
        Self {
            message: message.into(),
            correspondence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outgoing_common::MISSING_VALUE;

    fn record() -> CorrespondenceRecord {
        CorrespondenceRecord {
            reference_code: "B-I-CANT-1".to_string(),
            title: "Thomas Mann an Georg Cantor".to_string(),
            scope_and_content: "Kopie, handschriftlich".to_string(),
            date_expression: "01.01.1900".to_string(),
            notes_on_date: String::new(),
            extent: "1 Bl./1 S.".to_string(),
            language: "Deutsch".to_string(),
            id: 42,
        }
    }

    #[test]
    fn test_serializes_with_native_labels() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["Signatur"], "B-I-CANT-1");
        assert_eq!(json["Bemerkungen zum Umfang"], "1 Bl./1 S.");
        assert_eq!(json["ID"], 42);
        assert!(json.get("reference_code").is_none());
    }

    #[test]
    fn test_deserializes_native_labels() {
        let json = r#"{
            "Signatur": "B-I-CANT-1",
            "Titel": "Thomas Mann an Georg Cantor",
            "Form und Inhalt": "Kopie, handschriftlich",
            "Entstehungszeitraum": "01.01.1900",
            "Bemerkungen zur Datierung": "",
            "Bemerkungen zum Umfang": "1 Bl./1 S.",
            "Sprachen": "Deutsch",
            "ID": 42
        }"#;
        let parsed: CorrespondenceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, record());
    }

    #[test]
    fn test_deserializes_english_aliases() {
        let json = r#"{
            "reference_code": "B-I-CANT-1",
            "title": "Thomas Mann an Georg Cantor",
            "scope_and_content": "Kopie, handschriftlich",
            "date": "01.01.1900",
            "notes_on_date": "",
            "extent": "1 Bl./1 S.",
            "language": "Deutsch",
            "id": 42
        }"#;
        let parsed: CorrespondenceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, record());
    }

    #[test]
    fn test_negative_id_is_rejected() {
        let mut json = serde_json::to_value(record()).unwrap();
        json["ID"] = serde_json::json!(-1);
        assert!(serde_json::from_value::<CorrespondenceRecord>(json).is_err());
    }

    #[test]
    fn test_normalized_replaces_blank_fields() {
        let mut candidate = record();
        candidate.title = "   ".to_string();
        let normalized = candidate.normalized();
        assert_eq!(normalized.title, MISSING_VALUE);
        assert_eq!(normalized.notes_on_date, MISSING_VALUE);
        assert_eq!(normalized.reference_code, "B-I-CANT-1");
        assert_eq!(normalized.id, 42);
    }
}
