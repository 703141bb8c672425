//! Configuration for the correspondence catalogue
//!
//! Values are merged from built-in defaults, an optional YAML file and
//! `OUTGOING_*` environment variables, in that order of precedence. Command
//! line flags are applied on top by the binary.

use crate::error::{CatalogueError, Result};
use crate::store::table::{encoding_for_label, CsvTable};
use crate::validation::{
    BuiltinLanguageNames, ChainedLanguageNames, FileLanguageNames, LanguageValidator, Lifespan,
    RecordValidator,
};
use outgoing_common::{
    DEFAULT_DELIMITER, DEFAULT_ENCODING, DEFAULT_HOST, DEFAULT_LOCALE, DEFAULT_PORT,
    DEFAULT_TABLE_FILE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Catalogue configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueConfig {
    /// Path of the delimited table file
    pub table_path: PathBuf,
    /// Single-character column delimiter
    pub delimiter: String,
    /// Encoding label of the table file, e.g. `latin1` or `utf-8`
    pub encoding: String,
    /// Locale of the language display names
    pub locale: String,
    /// Optional file with additional language names, one per line
    pub extra_language_names: Option<PathBuf>,
    /// Refuse to open a table whose rows break field rules; `false` keeps
    /// such rows and only logs them
    pub strict_load: bool,
    /// HTTP bind address
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Directory for rolling log files
    pub log_dir: Option<PathBuf>,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from(DEFAULT_TABLE_FILE),
            delimiter: char::from(DEFAULT_DELIMITER).to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            extra_language_names: None,
            strict_load: true,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_dir: None,
        }
    }
}

impl CatalogueConfig {
    /// Default configuration for a table at `table_path`
    #[must_use]
    pub fn for_table<P: AsRef<Path>>(table_path: P) -> Self {
        Self {
            table_path: table_path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Load a configuration file; missing keys take their defaults
    ///
    /// # Errors
    /// Returns `CatalogueError::Configuration` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CatalogueError::configuration(format!("Failed to read {}: {e}", path.display()))
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            CatalogueError::configuration(format!("Failed to parse {}: {e}", path.display()))
        })
    }

    /// Defaults overridden by environment variables
    ///
    /// # Errors
    /// Returns `CatalogueError::Configuration` if a variable has an invalid value
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from `OUTGOING_*` environment variables
    ///
    /// # Errors
    /// Returns `CatalogueError::Configuration` if `OUTGOING_PORT` or
    /// `OUTGOING_STRICT_LOAD` cannot be parsed
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("OUTGOING_TABLE_PATH") {
            self.table_path = PathBuf::from(path);
        }
        if let Ok(encoding) = std::env::var("OUTGOING_ENCODING") {
            self.encoding = encoding;
        }
        if let Ok(locale) = std::env::var("OUTGOING_LOCALE") {
            self.locale = locale;
        }
        if let Ok(path) = std::env::var("OUTGOING_LANGUAGE_FILE") {
            self.extra_language_names = Some(PathBuf::from(path));
        }
        if let Ok(value) = std::env::var("OUTGOING_STRICT_LOAD") {
            self.strict_load = parse_bool("OUTGOING_STRICT_LOAD", &value)?;
        }
        if let Ok(host) = std::env::var("OUTGOING_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("OUTGOING_PORT") {
            self.port = port.trim().parse().map_err(|e| {
                CatalogueError::configuration(format!("Invalid OUTGOING_PORT '{port}': {e}"))
            })?;
        }
        Ok(())
    }

    /// Merge defaults, the optional file and the environment, then validate
    ///
    /// # Errors
    /// Returns `CatalogueError::Configuration` if any source is invalid
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                debug!("Loading configuration from file: {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        info!(
            table = %config.table_path.display(),
            encoding = %config.encoding,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Check the merged configuration
    ///
    /// # Errors
    /// Returns `CatalogueError::Configuration` describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        self.delimiter_byte()?;
        encoding_for_label(&self.encoding)?;
        if !BuiltinLanguageNames::supports(&self.locale) {
            return Err(CatalogueError::configuration(format!(
                "unsupported locale '{}'",
                self.locale
            )));
        }
        if self.host.trim().is_empty() {
            return Err(CatalogueError::configuration("host must not be empty"));
        }
        Ok(())
    }

    /// The delimiter as a single byte
    ///
    /// # Errors
    /// Returns `CatalogueError::Configuration` unless the delimiter is one ASCII character
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() && *byte != b'"' && *byte != b'\n' => Ok(*byte),
            _ => Err(CatalogueError::configuration(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            ))),
        }
    }

    /// Table persistence described by this configuration
    ///
    /// # Errors
    /// Returns `CatalogueError::Configuration` if the delimiter or encoding is invalid
    pub fn table(&self) -> Result<CsvTable> {
        CsvTable::new(&self.table_path)
            .with_delimiter(self.delimiter_byte()?)
            .with_encoding(&self.encoding)
    }

    /// Language validator for the configured locale and extra names
    #[must_use]
    pub fn language_validator(&self) -> LanguageValidator {
        match &self.extra_language_names {
            Some(path) => LanguageValidator::new(
                ChainedLanguageNames::new()
                    .with_source(BuiltinLanguageNames)
                    .with_source(FileLanguageNames::new(path)),
                self.locale.clone(),
            ),
            None => LanguageValidator::new(BuiltinLanguageNames, self.locale.clone()),
        }
    }

    /// Record validator using the default lifespan
    #[must_use]
    pub fn record_validator(&self) -> RecordValidator {
        RecordValidator::new(Lifespan::default(), Arc::new(self.language_validator()))
    }

    /// `host:port` for the HTTP listener
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(CatalogueError::configuration(format!(
            "Invalid {name} '{value}': expected true or false"
        ))),
    }
}
