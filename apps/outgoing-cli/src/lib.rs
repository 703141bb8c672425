//! Outgoing CLI library
//!
//! Command definitions and output helpers for the `outgoing` binary, plus the
//! HTTP service and logging setup it starts.

pub mod http;
pub mod logging;

use clap::{Parser, Subcommand};
use outgoing_common::format_date;
use outgoing_core::{
    CatalogueConfig, CatalogueError, CorrespondenceRecord, CorrespondenceStore, LanguageValidator,
    Result, ValidatedRecord,
};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "outgoing")]
#[command(about = "Manage the catalogue of Thomas Mann's outgoing correspondence")]
#[command(version)]
pub struct Cli {
    /// Table file (overrides configuration and OUTGOING_TABLE_PATH)
    #[arg(long, short)]
    pub table: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List correspondences in storage order
    List {
        /// Limit number of results
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Show one correspondence as JSON
    Get {
        /// Record ID
        id: u64,
    },
    /// Add a correspondence from a JSON file
    Add {
        /// JSON file with one record
        file: PathBuf,
    },
    /// Replace a correspondence with the record in a JSON file
    Replace {
        /// Record ID
        id: u64,
        /// JSON file with one record
        file: PathBuf,
    },
    /// Delete a correspondence
    Delete {
        /// Record ID
        id: u64,
    },
    /// Check a record without changing the table
    Validate {
        /// JSON file with one record
        file: PathBuf,
        /// Validate as a replacement of this ID
        #[arg(long)]
        replacing: Option<u64>,
    },
    /// List accepted language names
    Languages {
        /// Only names containing this text (case-insensitive)
        #[arg(long, short)]
        filter: Option<String>,
    },
    /// Start the HTTP service
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(long, short)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Configuration from file and environment with command line overrides applied
    ///
    /// # Errors
    /// Returns `CatalogueError::Configuration` if any source is invalid
    pub fn resolve_config(&self) -> Result<CatalogueConfig> {
        let mut config = CatalogueConfig::load(self.config.as_deref())?;
        if let Some(table) = &self.table {
            config.table_path.clone_from(table);
        }
        if let Commands::Serve { host, port } = &self.command {
            if let Some(host) = host {
                config.host.clone_from(host);
            }
            if let Some(port) = port {
                config.port = *port;
            }
        }
        config.validate()?;
        Ok(config)
    }
}

/// Read one candidate record from a JSON file
///
/// # Errors
/// Returns `CatalogueError::Io` if the file cannot be read or
/// `CatalogueError::Serialization` if it is not a record
pub fn read_candidate(path: &Path) -> Result<CorrespondenceRecord> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Run a command that works on an open store
///
/// # Errors
/// Returns the store error, or `CatalogueError::Configuration` for commands
/// that do not use the store
pub fn execute<W: Write>(
    command: &Commands,
    store: &CorrespondenceStore,
    writer: &mut W,
) -> Result<()> {
    match command {
        Commands::List { limit } => {
            let records = store.list_all();
            let records = match limit {
                Some(limit) => &records[..records.len().min(*limit)],
                None => &records[..],
            };
            print_records(records, writer)
        }
        Commands::Get { id } => print_json(&store.get(*id)?, writer),
        Commands::Add { file } => {
            let stored = store.insert(&read_candidate(file)?)?;
            print_json(&stored, writer)
        }
        Commands::Replace { id, file } => {
            let stored = store.replace(*id, &read_candidate(file)?)?;
            print_json(&stored, writer)
        }
        Commands::Delete { id } => {
            let removed = store.delete(*id)?;
            print_json(&removed, writer)
        }
        Commands::Validate { file, replacing } => {
            let validated = store.validate_only(&read_candidate(file)?, *replacing)?;
            print_validated(&validated, writer)
        }
        Commands::Languages { .. } | Commands::Serve { .. } => Err(CatalogueError::configuration(
            "command does not operate on the correspondence table",
        )),
    }
}

/// Print records to the given writer
///
/// # Errors
/// Returns an error if writing fails
pub fn print_records<W: Write>(records: &[CorrespondenceRecord], writer: &mut W) -> Result<()> {
    if records.is_empty() {
        writeln!(writer, "No correspondences found")?;
        return Ok(());
    }

    writeln!(writer, "Found {} correspondences:", records.len())?;
    for record in records {
        writeln!(
            writer,
            "  • {:>5}  {}  {}",
            record.id, record.reference_code, record.title
        )?;
        writeln!(
            writer,
            "           {} | {} | {}",
            record.date_expression, record.extent, record.language
        )?;
    }
    Ok(())
}

/// Print a value as pretty JSON
///
/// # Errors
/// Returns an error if serialization or writing fails
pub fn print_json<T: Serialize, W: Write>(value: &T, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Print the outcome of a dry-run validation
///
/// # Errors
/// Returns an error if writing fails
pub fn print_validated<W: Write>(validated: &ValidatedRecord, writer: &mut W) -> Result<()> {
    let dating = &validated.dating;
    writeln!(
        writer,
        "Valid: {} (ID {})",
        validated.record.reference_code, validated.record.id
    )?;
    writeln!(
        writer,
        "  Dated {} to {}{}",
        format_date(&dating.start),
        format_date(&dating.end),
        if dating.approximate {
            " (approximate)"
        } else {
            ""
        }
    )?;
    Ok(())
}

/// Print accepted language names, optionally filtered
///
/// # Errors
/// Returns an error if the name table cannot be built or writing fails
pub fn print_languages<W: Write>(
    languages: &LanguageValidator,
    filter: Option<&str>,
    writer: &mut W,
) -> Result<()> {
    let needle = filter.map(|f| f.trim().to_lowercase());
    let names: Vec<&String> = languages
        .known_names()?
        .iter()
        .filter(|name| {
            needle
                .as_deref()
                .map_or(true, |needle| name.to_lowercase().contains(needle))
        })
        .collect();

    if names.is_empty() {
        writeln!(writer, "No languages found")?;
        return Ok(());
    }
    for name in names {
        writeln!(writer, "{name}")?;
    }
    Ok(())
}
