use crate::{
    config::CatalogueConfig,
    error::{CatalogueError, Result},
    models::{CorrespondenceRecord, ValidatedRecord},
    store::{
        mappers::{fields_to_record, record_to_fields, FieldMap},
        table::TablePersistence,
    },
    validation::{RecordSnapshot, RecordValidator},
};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info, instrument, warn};

/// How rows that break field rules are treated when the table is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Refuse to open the table
    #[default]
    Strict,
    /// Keep the row and log a warning. Kept rows are written back unchanged
    /// on the next committed mutation.
    Lenient,
}

impl LoadMode {
    #[must_use]
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

/// Write-through store of correspondence records
///
/// The full table is held in memory in storage order. Every committed
/// mutation rewrites the durable table before it returns; if the write fails
/// the in-memory change is undone.
#[derive(Debug)]
pub struct CorrespondenceStore {
    rows: RwLock<Vec<CorrespondenceRecord>>,
    persistence: Box<dyn TablePersistence>,
    validator: RecordValidator,
}

impl CorrespondenceStore {
    /// Open the table described by `config`
    ///
    /// # Errors
    /// Returns `CatalogueError::Configuration` for an invalid configuration,
    /// `CatalogueError::CorruptTable` if the stored rows are inconsistent, or
    /// the underlying I/O or CSV error
    #[instrument(skip(config), fields(table = %config.table_path.display()))]
    pub fn open(config: &CatalogueConfig) -> Result<Self> {
        config.validate()?;
        Self::open_with(
            Box::new(config.table()?),
            config.record_validator(),
            LoadMode::from_strict(config.strict_load),
        )
    }

    /// Open a store on any table persistence
    ///
    /// # Errors
    /// Returns `CatalogueError::Configuration` if the language names cannot be
    /// loaded, or `CatalogueError::CorruptTable` if the stored rows are inconsistent
    #[instrument(skip(persistence, validator))]
    pub fn open_with(
        persistence: Box<dyn TablePersistence>,
        validator: RecordValidator,
        mode: LoadMode,
    ) -> Result<Self> {
        validator.languages().known_names()?;
        let table = persistence.load_table()?;
        let rows = load_rows(&table, &validator, mode)?;
        info!("Opened correspondence table with {} records", rows.len());

        Ok(Self {
            rows: RwLock::new(rows),
            persistence,
            validator,
        })
    }

    /// All records in storage order
    #[instrument(skip(self))]
    pub fn list_all(&self) -> Vec<CorrespondenceRecord> {
        self.rows.read().clone()
    }

    /// The record with `id`
    ///
    /// # Errors
    /// Returns `CatalogueError::NotFound` if no record has that id
    #[instrument(skip(self))]
    pub fn get(&self, id: u64) -> Result<CorrespondenceRecord> {
        self.rows
            .read()
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(CatalogueError::NotFound { id })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Run every validation rule without changing the store
    ///
    /// With `exclude_id` set, the candidate is checked as a replacement of that
    /// record and fails the same way [`Self::replace`] would.
    ///
    /// # Errors
    /// Returns `CatalogueError::IdentifierMismatch` or `CatalogueError::NotFound`
    /// for a replacement that cannot apply, otherwise the first failing rule's error
    #[instrument(skip(self, candidate), fields(id = candidate.id))]
    pub fn validate_only(
        &self,
        candidate: &CorrespondenceRecord,
        exclude_id: Option<u64>,
    ) -> Result<ValidatedRecord> {
        if let Some(id) = exclude_id {
            if candidate.id != id {
                return Err(CatalogueError::IdentifierMismatch {
                    path_id: id,
                    payload_id: candidate.id,
                });
            }
        }

        let rows = self.rows.read();
        if let Some(id) = exclude_id {
            if !rows.iter().any(|record| record.id == id) {
                return Err(CatalogueError::NotFound { id });
            }
        }
        self.validator.validate(
            candidate,
            &RecordSnapshot::from_records(rows.iter()),
            exclude_id,
        )
    }

    /// Validate a new record, append it and persist the table
    ///
    /// # Errors
    /// Returns a validation error, leaving the store unchanged, or
    /// `CatalogueError::Persistence` after undoing the append
    #[instrument(skip(self, candidate), fields(id = candidate.id))]
    pub fn insert(&self, candidate: &CorrespondenceRecord) -> Result<CorrespondenceRecord> {
        let mut rows = self.rows.write();
        let validated = self.validator.validate(
            candidate,
            &RecordSnapshot::from_records(rows.iter()),
            None,
        )?;
        let stored = validated.into_stored();

        rows.push(stored.clone());
        if let Err(e) = self.persist(&rows) {
            rows.pop();
            error!("Failed to persist new record {}: {}", stored.id, e);
            return Err(e);
        }

        info!("Created correspondence {} ({})", stored.id, stored.reference_code);
        Ok(stored)
    }

    /// Replace the record with `id` and persist the table
    ///
    /// # Errors
    /// Returns `CatalogueError::IdentifierMismatch` if `candidate.id` differs
    /// from `id`, `CatalogueError::NotFound` if there is no such record, a
    /// validation error, or `CatalogueError::Persistence` after restoring the
    /// previous record
    #[instrument(skip(self, candidate))]
    pub fn replace(
        &self,
        id: u64,
        candidate: &CorrespondenceRecord,
    ) -> Result<CorrespondenceRecord> {
        if candidate.id != id {
            return Err(CatalogueError::IdentifierMismatch {
                path_id: id,
                payload_id: candidate.id,
            });
        }

        let mut rows = self.rows.write();
        let position = rows
            .iter()
            .position(|record| record.id == id)
            .ok_or(CatalogueError::NotFound { id })?;
        let validated = self.validator.validate(
            candidate,
            &RecordSnapshot::from_records(rows.iter()),
            Some(id),
        )?;
        let stored = validated.into_stored();

        let previous = std::mem::replace(&mut rows[position], stored.clone());
        if let Err(e) = self.persist(&rows) {
            rows[position] = previous;
            error!("Failed to persist replacement of record {}: {}", id, e);
            return Err(e);
        }

        info!("Updated correspondence {}", id);
        Ok(stored)
    }

    /// Remove the record with `id` and persist the table
    ///
    /// # Errors
    /// Returns `CatalogueError::NotFound` if there is no such record, or
    /// `CatalogueError::Persistence` after putting the record back
    #[instrument(skip(self))]
    pub fn delete(&self, id: u64) -> Result<CorrespondenceRecord> {
        let mut rows = self.rows.write();
        let position = rows
            .iter()
            .position(|record| record.id == id)
            .ok_or(CatalogueError::NotFound { id })?;

        let removed = rows.remove(position);
        if let Err(e) = self.persist(&rows) {
            rows.insert(position, removed);
            error!("Failed to persist deletion of record {}: {}", id, e);
            return Err(e);
        }

        info!("Deleted correspondence {}", id);
        Ok(removed)
    }

    /// Write the current rows once more and release the store
    ///
    /// # Errors
    /// Returns `CatalogueError::Persistence` if the final write fails
    #[instrument(skip(self))]
    pub fn close(self) -> Result<()> {
        let rows = self.rows.into_inner();
        let table: Vec<FieldMap> = rows.iter().map(record_to_fields).collect();
        self.persistence
            .save_table(&table)
            .map_err(into_persistence)?;
        debug!("Closed correspondence table");
        Ok(())
    }

    fn persist(&self, rows: &[CorrespondenceRecord]) -> Result<()> {
        let table: Vec<FieldMap> = rows.iter().map(record_to_fields).collect();
        self.persistence.save_table(&table).map_err(into_persistence)
    }
}

fn into_persistence(error: CatalogueError) -> CatalogueError {
    match error {
        CatalogueError::Persistence { .. } => error,
        other => CatalogueError::persistence(other.to_string()),
    }
}

/// Map and check loaded table rows
///
/// Identifier and reference code collisions always fail. Field rule
/// violations fail only in strict mode.
fn load_rows(
    table: &[FieldMap],
    validator: &RecordValidator,
    mode: LoadMode,
) -> Result<Vec<CorrespondenceRecord>> {
    let mut rows = Vec::with_capacity(table.len());
    let mut ids = HashSet::with_capacity(table.len());
    let mut codes: HashMap<String, u64> = HashMap::with_capacity(table.len());
    let empty = RecordSnapshot::default();

    for (index, fields) in table.iter().enumerate() {
        let row = index + 1;
        let record = fields_to_record(row, fields)?;

        if !ids.insert(record.id) {
            return Err(CatalogueError::corrupt_table(
                row,
                format!("duplicate ID {}", record.id),
            ));
        }
        if let Some(owner) = codes.insert(record.reference_code.clone(), record.id) {
            return Err(CatalogueError::corrupt_table(
                row,
                format!(
                    "reference code '{}' already used by ID {owner}",
                    record.reference_code
                ),
            ));
        }

        if let Err(e) = validator.validate(&record, &empty, None) {
            match mode {
                LoadMode::Strict => {
                    return Err(CatalogueError::corrupt_table(row, e.to_string()));
                }
                LoadMode::Lenient => warn!("Row {} (ID {}): {}", row, record.id, e),
            }
        }

        rows.push(record);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::table::CsvTable;
    use outgoing_common::{FIELD_LABELS, LABEL_ID, LABEL_REFERENCE_CODE, MISSING_VALUE};
    use tempfile::TempDir;

    fn fields(id: &str, code: &str, date: &str) -> FieldMap {
        let values = [
            code,
            "Thomas Mann an Georg Cantor",
            "",
            date,
            "",
            "1 Bl./1 S.",
            "Deutsch",
            id,
        ];
        FIELD_LABELS
            .iter()
            .zip(values)
            .map(|(label, value)| (label.to_string(), value.to_string()))
            .collect()
    }

    fn store_with(rows: &[FieldMap], mode: LoadMode) -> (TempDir, Result<CorrespondenceStore>) {
        let dir = TempDir::new().unwrap();
        let table = CsvTable::new(dir.path().join("outgoing.csv"));
        table.save_table(rows).unwrap();
        let store = CorrespondenceStore::open_with(Box::new(table), RecordValidator::default(), mode);
        (dir, store)
    }

    #[test]
    fn test_load_normalizes_blank_fields() {
        let (_dir, store) = store_with(&[fields("1", "B-I-CANT-1", "01.01.1900")], LoadMode::Lenient);
        let record = store.unwrap().get(1).unwrap();
        assert_eq!(record.scope_and_content, MISSING_VALUE);
        assert_eq!(record.notes_on_date, MISSING_VALUE);
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let (_dir, store) = store_with(
            &[
                fields("1", "B-I-CANT-1", "01.01.1900"),
                fields("1", "B-I-CANT-2", "01.01.1900"),
            ],
            LoadMode::Lenient,
        );
        assert!(matches!(store, Err(CatalogueError::CorruptTable { row: 2, .. })));
    }

    #[test]
    fn test_load_rejects_duplicate_codes() {
        let (_dir, store) = store_with(
            &[
                fields("1", "B-I-CANT-1", "01.01.1900"),
                fields("2", "B-I-CANT-1", "01.01.1900"),
            ],
            LoadMode::Lenient,
        );
        assert!(matches!(store, Err(CatalogueError::CorruptTable { row: 2, .. })));
    }

    #[test]
    fn test_load_rejects_bad_id() {
        let mut row = fields("1", "B-I-CANT-1", "01.01.1900");
        row.insert(LABEL_ID.to_string(), "eins".to_string());
        let (_dir, store) = store_with(&[row], LoadMode::Lenient);
        assert!(matches!(store, Err(CatalogueError::CorruptTable { row: 1, .. })));
    }

    #[test]
    fn test_load_modes_for_rule_violations() {
        let legacy = fields("1", "B-I-CANT-1", "1800");

        let (_dir, lenient) = store_with(&[legacy.clone()], LoadMode::Lenient);
        assert_eq!(lenient.unwrap().len(), 1);

        let (_dir, strict) = store_with(&[legacy], LoadMode::Strict);
        assert!(matches!(strict, Err(CatalogueError::CorruptTable { row: 1, .. })));
    }

    #[test]
    fn test_load_rejects_missing_reference_code_in_strict_mode() {
        let mut row = fields("1", "B-I-CANT-1", "01.01.1900");
        row.insert(LABEL_REFERENCE_CODE.to_string(), String::new());
        let (_dir, strict) = store_with(&[row], LoadMode::Strict);
        assert!(strict.is_err());
    }

    #[test]
    fn test_load_mode_from_strict() {
        assert_eq!(LoadMode::from_strict(true), LoadMode::Strict);
        assert_eq!(LoadMode::from_strict(false), LoadMode::Lenient);
        assert_eq!(LoadMode::default(), LoadMode::Strict);
    }

    #[test]
    fn test_open_fails_without_language_names() {
        use crate::validation::{
            BuiltinLanguageNames, ChainedLanguageNames, FileLanguageNames, LanguageValidator,
            Lifespan,
        };
        use std::sync::Arc;

        let dir = TempDir::new().unwrap();
        let languages = LanguageValidator::new(
            ChainedLanguageNames::new()
                .with_source(BuiltinLanguageNames)
                .with_source(FileLanguageNames::new(dir.path().join("nope.txt"))),
            "de",
        );
        let validator = RecordValidator::new(Lifespan::default(), Arc::new(languages));
        let table = CsvTable::new(dir.path().join("outgoing.csv"));

        let store = CorrespondenceStore::open_with(Box::new(table), validator, LoadMode::Strict);
        assert!(matches!(store, Err(CatalogueError::Configuration { .. })));
        assert!(!dir.path().join("outgoing.csv").exists());
    }

    #[test]
    fn test_into_persistence_keeps_message() {
        let error = into_persistence(CatalogueError::persistence("disk full"));
        assert_eq!(error.to_string(), "Failed to persist table: disk full");

        let error = into_persistence(std::io::Error::other("read-only").into());
        assert!(matches!(error, CatalogueError::Persistence { .. }));
        assert!(error.to_string().contains("read-only"));
    }
}
