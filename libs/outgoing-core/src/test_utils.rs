//! Test utilities and sample data for the correspondence catalogue

use crate::error::{CatalogueError, Result};
use crate::models::CorrespondenceRecord;
use crate::store::{record_to_fields, CsvTable, FieldMap, TablePersistence};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A valid record that does not clash with [`create_mock_records`]
#[must_use]
pub fn sample_record(id: u64, reference_code: &str) -> CorrespondenceRecord {
    CorrespondenceRecord {
        reference_code: reference_code.to_string(),
        title: "Thomas Mann an Leonhard Euler".to_string(),
        scope_and_content: "Brief über Mathematik und Literatur".to_string(),
        date_expression: "01.01.1901".to_string(),
        notes_on_date: String::new(),
        extent: "1 Bl./1 S.".to_string(),
        language: "Deutsch".to_string(),
        id,
    }
}

/// Stored records with ids 1, 5 and 42
#[must_use]
pub fn create_mock_records() -> Vec<CorrespondenceRecord> {
    vec![
        CorrespondenceRecord {
            reference_code: "B-I-ALBER-3".to_string(),
            title: "Thomas Mann an Hans Albers".to_string(),
            scope_and_content: "Postkarte, eigenhändig".to_string(),
            date_expression: "ca. 06.1921".to_string(),
            notes_on_date: "Datum erschlossen".to_string(),
            extent: "1 Bl./2 S.".to_string(),
            language: "Deutsch".to_string(),
            id: 1,
        },
        CorrespondenceRecord {
            reference_code: "B-I-BERT-5.1".to_string(),
            title: "Thomas Mann an Ernst Bertram".to_string(),
            scope_and_content: "Brief, maschinenschriftlich".to_string(),
            date_expression: "12.03.1918".to_string(),
            notes_on_date: outgoing_common::MISSING_VALUE.to_string(),
            extent: "2 Bl./3 S. + 1 Bl./1 S.".to_string(),
            language: "Deutsch".to_string(),
            id: 5,
        },
        CorrespondenceRecord {
            reference_code: "B-I-CANT-1".to_string(),
            title: "Thomas Mann an Georg Cantor".to_string(),
            scope_and_content: "Kopie".to_string(),
            date_expression: "1900".to_string(),
            notes_on_date: outgoing_common::MISSING_VALUE.to_string(),
            extent: "1 Bl./1 S.".to_string(),
            language: "Französisch".to_string(),
            id: 42,
        },
    ]
}

/// Write [`create_mock_records`] to a CSV table at `path`
///
/// # Errors
/// Returns `CatalogueError::Persistence` if the file cannot be written
pub fn create_test_table<P: AsRef<Path>>(path: P) -> Result<CsvTable> {
    let table = CsvTable::new(path);
    let rows: Vec<FieldMap> = create_mock_records().iter().map(record_to_fields).collect();
    table.save_table(&rows)?;
    Ok(table)
}

/// Table wrapper whose saves can be made to fail on demand
#[derive(Debug, Clone)]
pub struct FlakyTable<T> {
    inner: T,
    failing: Arc<AtomicBool>,
}

impl<T: TablePersistence> FlakyTable<T> {
    #[must_use]
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle that switches failure on and off after the table is boxed
    #[must_use]
    pub fn switch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.failing)
    }
}

impl<T: TablePersistence> TablePersistence for FlakyTable<T> {
    fn load_table(&self) -> Result<Vec<FieldMap>> {
        self.inner.load_table()
    }

    fn save_table(&self, rows: &[FieldMap]) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogueError::persistence("simulated write failure"));
        }
        self.inner.save_table(rows)
    }
}

/// Table kept in memory, counting saves
#[derive(Debug, Default)]
pub struct MemoryTable {
    rows: Mutex<Vec<FieldMap>>,
    saves: Mutex<usize>,
}

impl MemoryTable {
    #[must_use]
    pub fn with_records(records: &[CorrespondenceRecord]) -> Self {
        Self {
            rows: Mutex::new(records.iter().map(record_to_fields).collect()),
            saves: Mutex::new(0),
        }
    }

    #[must_use]
    pub fn rows(&self) -> Vec<FieldMap> {
        self.rows.lock().clone()
    }

    #[must_use]
    pub fn saves(&self) -> usize {
        *self.saves.lock()
    }
}

impl TablePersistence for MemoryTable {
    fn load_table(&self) -> Result<Vec<FieldMap>> {
        Ok(self.rows.lock().clone())
    }

    fn save_table(&self, rows: &[FieldMap]) -> Result<()> {
        *self.rows.lock() = rows.to_vec();
        *self.saves.lock() += 1;
        Ok(())
    }
}
