//! Durable table storage
//!
//! The store reads the whole table once at startup and writes the whole table
//! after every committed mutation. [`CsvTable`] keeps the table in a
//! delimiter-separated file with a header row and a single-byte text encoding.

use crate::error::{CatalogueError, Result};
use crate::store::mappers::FieldMap;
use encoding_rs::Encoding;
use outgoing_common::{DEFAULT_DELIMITER, FIELD_LABELS};
use std::fmt::Debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

/// Load and save the full table
pub trait TablePersistence: Send + Sync + Debug {
    /// Read every row in stored order
    ///
    /// # Errors
    /// Returns an error if the table exists but cannot be read or parsed
    fn load_table(&self) -> Result<Vec<FieldMap>>;

    /// Replace the stored table with `rows`
    ///
    /// # Errors
    /// Returns `CatalogueError::Persistence` if the table cannot be written
    fn save_table(&self, rows: &[FieldMap]) -> Result<()>;
}

impl<T: TablePersistence + ?Sized> TablePersistence for Arc<T> {
    fn load_table(&self) -> Result<Vec<FieldMap>> {
        (**self).load_table()
    }

    fn save_table(&self, rows: &[FieldMap]) -> Result<()> {
        (**self).save_table(rows)
    }
}

/// Table kept in a CSV file
#[derive(Debug, Clone)]
pub struct CsvTable {
    path: PathBuf,
    delimiter: u8,
    encoding: &'static Encoding,
}

impl CsvTable {
    /// Table at `path` with the catalogue's default delimiter and encoding
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            delimiter: DEFAULT_DELIMITER,
            encoding: encoding_rs::WINDOWS_1252,
        }
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Use the encoding named by a WHATWG label such as `latin1` or `utf-8`
    ///
    /// # Errors
    /// Returns `CatalogueError::Configuration` if the label is unknown
    pub fn with_encoding(mut self, label: &str) -> Result<Self> {
        self.encoding = encoding_for_label(label)?;
        Ok(self)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    fn encode_rows(&self, rows: &[FieldMap]) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(FIELD_LABELS)?;
        for (index, row) in rows.iter().enumerate() {
            let cells = FIELD_LABELS
                .iter()
                .map(|label| {
                    row.get(*label).map(String::as_str).ok_or_else(|| {
                        CatalogueError::persistence(format!(
                            "row {} has no value for column '{label}'",
                            index + 1
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            writer.write_record(cells)?;
        }

        let utf8 = writer
            .into_inner()
            .map_err(|e| CatalogueError::persistence(format!("Failed to flush CSV: {e}")))?;
        let text = String::from_utf8(utf8)
            .map_err(|e| CatalogueError::persistence(format!("CSV output is not UTF-8: {e}")))?;

        let (bytes, _, had_errors) = self.encoding.encode(&text);
        if had_errors {
            return Err(CatalogueError::persistence(format!(
                "table contains characters that cannot be encoded as {}",
                self.encoding.name()
            )));
        }
        Ok(bytes.into_owned())
    }
}

impl TablePersistence for CsvTable {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load_table(&self) -> Result<Vec<FieldMap>> {
        if !self.path.exists() {
            info!("Table file does not exist, starting with an empty table");
            return Ok(Vec::new());
        }

        let bytes = std::fs::read(&self.path)?;
        // A byte-order mark is only dropped when it belongs to the configured encoding
        let (text, had_errors) = self.encoding.decode_with_bom_removal(&bytes);
        if had_errors {
            return Err(CatalogueError::corrupt_table(
                0,
                format!("file is not valid {}", self.encoding.name()),
            ));
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if let Some(missing) = FIELD_LABELS
            .iter()
            .find(|label| !headers.iter().any(|h| h == *label))
        {
            return Err(CatalogueError::corrupt_table(
                0,
                format!("header has no column '{missing}'"),
            ));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(
                headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect::<FieldMap>(),
            );
        }

        debug!("Loaded {} rows", rows.len());
        Ok(rows)
    }

    #[instrument(skip(self, rows), fields(path = %self.path.display(), rows = rows.len()))]
    fn save_table(&self, rows: &[FieldMap]) -> Result<()> {
        let bytes = self.encode_rows(rows)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let persist_error =
            |e: std::io::Error| CatalogueError::persistence(format!("{}: {e}", self.path.display()));

        let mut temp = NamedTempFile::new_in(dir).map_err(persist_error)?;
        temp.write_all(&bytes).map_err(persist_error)?;
        temp.as_file().sync_all().map_err(persist_error)?;
        temp.persist(&self.path)
            .map_err(|e| persist_error(e.error))?;

        debug!("Saved {} rows", rows.len());
        Ok(())
    }
}

/// Resolve a WHATWG encoding label
///
/// # Errors
/// Returns `CatalogueError::Configuration` if the label is unknown
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
        CatalogueError::configuration(format!("unknown text encoding '{label}'"))
    })
}
