//! Record validation pipeline
//!
//! A candidate passes through an ordered list of rules. The first failing rule
//! ends validation and its error is the one reported:
//!
//! 1. reference code and extent grammars
//! 2. date expression (format, then overlap with the lifespan)
//! 3. language name
//! 4. identifier uniqueness, or identity with the replaced record
//! 5. reference code uniqueness, ignoring the replaced record
//!
//! Validation reads a [`RecordSnapshot`] of the store and has no side effects.

use crate::error::{CatalogueError, Result};
use crate::models::{CorrespondenceRecord, ValidatedRecord};
use crate::validation::dating::Lifespan;
use crate::validation::language::LanguageValidator;
use crate::validation::patterns;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Identifiers and reference codes present in the store at validation time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSnapshot {
    pub ids: HashSet<u64>,
    /// Reference code to the id of the record that owns it
    pub codes: HashMap<String, u64>,
}

impl RecordSnapshot {
    /// Snapshot of a sequence of records
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CorrespondenceRecord>) -> Self {
        let mut snapshot = Self::default();
        for record in records {
            snapshot.ids.insert(record.id);
            snapshot
                .codes
                .insert(record.reference_code.clone(), record.id);
        }
        snapshot
    }
}

fn check_patterns(candidate: &CorrespondenceRecord) -> Result<()> {
    patterns::check_reference_code(&candidate.reference_code)?;
    patterns::check_extent(&candidate.extent)
}

fn check_identifier(
    candidate: &CorrespondenceRecord,
    snapshot: &RecordSnapshot,
    exclude_id: Option<u64>,
) -> Result<()> {
    let id = candidate.id;
    match exclude_id {
        Some(replaced) if replaced != id => Err(CatalogueError::IdentifierMismatch {
            path_id: replaced,
            payload_id: id,
        }),
        Some(_) => Ok(()),
        None if snapshot.ids.contains(&id) => Err(CatalogueError::DuplicateIdentifier { id }),
        None => Ok(()),
    }
}

fn check_reference_code_unique(
    candidate: &CorrespondenceRecord,
    snapshot: &RecordSnapshot,
    exclude_id: Option<u64>,
) -> Result<()> {
    let code = &candidate.reference_code;
    match snapshot.codes.get(code) {
        Some(&owner) if Some(owner) != exclude_id => {
            Err(CatalogueError::DuplicateReferenceCode {
                code: code.clone(),
                existing_id: owner,
            })
        }
        _ => Ok(()),
    }
}

/// Applies every field and cross-record rule to candidate records
#[derive(Debug, Clone)]
pub struct RecordValidator {
    lifespan: Lifespan,
    languages: Arc<LanguageValidator>,
}

impl RecordValidator {
    #[must_use]
    pub fn new(lifespan: Lifespan, languages: Arc<LanguageValidator>) -> Self {
        Self {
            lifespan,
            languages,
        }
    }

    #[must_use]
    pub fn lifespan(&self) -> &Lifespan {
        &self.lifespan
    }

    #[must_use]
    pub fn languages(&self) -> &LanguageValidator {
        &self.languages
    }

    /// Validate a candidate against a store snapshot
    ///
    /// `exclude_id` is the id of the record being replaced, or `None` when the
    /// candidate is a new record.
    ///
    /// # Errors
    /// Returns the error of the first rule that fails
    pub fn validate(
        &self,
        candidate: &CorrespondenceRecord,
        snapshot: &RecordSnapshot,
        exclude_id: Option<u64>,
    ) -> Result<ValidatedRecord> {
        check_patterns(candidate)?;
        let dating = self.lifespan.parse_within(&candidate.date_expression)?;
        let language = self.languages.validate(&candidate.language)?;
        check_identifier(candidate, snapshot, exclude_id)?;
        check_reference_code_unique(candidate, snapshot, exclude_id)?;

        Ok(ValidatedRecord {
            record: CorrespondenceRecord {
                language,
                ..candidate.clone()
            },
            dating,
        })
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self {
            lifespan: Lifespan::default(),
            languages: Arc::new(LanguageValidator::default()),
        }
    }
}
