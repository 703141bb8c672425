//! Language name validation against a locale's display-name table
//!
//! The accepted names come from a [`LanguageNameSource`], loaded once per
//! validator and cached. Membership is case-insensitive; the validated value
//! keeps the caller's casing and is only trimmed.

use crate::error::{CatalogueError, Result};
use once_cell::sync::{Lazy, OnceCell};
use outgoing_common::{fold_name, DEFAULT_LOCALE};
use std::collections::HashSet;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use strsim::normalized_levenshtein;
use tracing::{debug, instrument};

/// Minimum similarity for an unknown name to get a suggestion
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// German display names shipped with the crate
const BUILTIN_DE: &str = include_str!("../../data/languages_de.txt");

/// Provider of the language display names of a locale
pub trait LanguageNameSource: Send + Sync + Debug {
    /// All display names known for `locale`
    ///
    /// # Errors
    /// Returns an error if the locale is not supported or the names cannot be read
    fn name_set(&self, locale: &str) -> Result<HashSet<String>>;
}

/// Locales served by the built-in table
const BUILTIN_LOCALES: [&str; 3] = ["de", "de_DE", "de-DE"];

/// The built-in table of German language names
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLanguageNames;

impl BuiltinLanguageNames {
    /// Whether the built-in table has names for `locale`
    #[must_use]
    pub fn supports(locale: &str) -> bool {
        BUILTIN_LOCALES.contains(&locale)
    }
}

impl LanguageNameSource for BuiltinLanguageNames {
    fn name_set(&self, locale: &str) -> Result<HashSet<String>> {
        if Self::supports(locale) {
            return Ok(parse_name_list(BUILTIN_DE));
        }
        Err(CatalogueError::configuration(format!(
            "no built-in language names for locale '{locale}'"
        )))
    }
}

/// Names read from a text file, one per line
///
/// Blank lines and lines starting with `#` are ignored. The file applies to
/// whatever locale is requested.
#[derive(Debug, Clone)]
pub struct FileLanguageNames {
    path: PathBuf,
}

impl FileLanguageNames {
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl LanguageNameSource for FileLanguageNames {
    fn name_set(&self, _locale: &str) -> Result<HashSet<String>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            CatalogueError::configuration(format!(
                "Failed to read language names from {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(parse_name_list(&content))
    }
}

/// Union of several sources, e.g. the built-in table plus local additions
#[derive(Debug, Default)]
pub struct ChainedLanguageNames {
    sources: Vec<Box<dyn LanguageNameSource>>,
}

impl ChainedLanguageNames {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_source(mut self, source: impl LanguageNameSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl LanguageNameSource for ChainedLanguageNames {
    fn name_set(&self, locale: &str) -> Result<HashSet<String>> {
        let mut names = HashSet::new();
        for source in &self.sources {
            names.extend(source.name_set(locale)?);
        }
        Ok(names)
    }
}

fn parse_name_list(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[derive(Debug)]
struct NameTable {
    folded: HashSet<String>,
    display: Vec<String>,
}

/// Case-insensitive membership check of language names
#[derive(Debug)]
pub struct LanguageValidator {
    source: Box<dyn LanguageNameSource>,
    locale: String,
    table: OnceCell<NameTable>,
}

static DEFAULT_VALIDATOR: Lazy<LanguageValidator> = Lazy::new(LanguageValidator::default);

/// Process-wide validator over the built-in German table
#[must_use]
pub fn default_validator() -> &'static LanguageValidator {
    &DEFAULT_VALIDATOR
}

impl LanguageValidator {
    /// Create a validator for `locale` backed by `source`
    #[must_use]
    pub fn new(source: impl LanguageNameSource + 'static, locale: impl Into<String>) -> Self {
        Self {
            source: Box::new(source),
            locale: locale.into(),
            table: OnceCell::new(),
        }
    }

    /// Locale whose names this validator accepts
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    fn table(&self) -> Result<&NameTable> {
        self.table.get_or_try_init(|| {
            let names = self.source.name_set(&self.locale)?;
            let mut sorted: Vec<String> = names.iter().cloned().collect();
            sorted.sort();
            let folded = names.iter().map(|name| fold_name(name)).collect();
            debug!(
                "Loaded {} language names for locale '{}'",
                sorted.len(),
                self.locale
            );
            Ok(NameTable {
                folded,
                display: sorted,
            })
        })
    }

    /// Validate a language name and return it trimmed
    ///
    /// # Errors
    /// Returns `CatalogueError::UnknownLanguage` if the folded name is not in the
    /// table, or the source's error if the table cannot be loaded
    #[instrument(skip(self))]
    pub fn validate(&self, name: &str) -> Result<String> {
        let table = self.table()?;
        let trimmed = name.trim();
        if !trimmed.is_empty() && table.folded.contains(&fold_name(trimmed)) {
            return Ok(trimmed.to_string());
        }
        Err(CatalogueError::UnknownLanguage {
            name: name.to_string(),
            suggestion: Self::suggest(table, trimmed),
        })
    }

    /// Whether a name is known, ignoring case and padding
    ///
    /// # Errors
    /// Returns an error if the table cannot be loaded
    pub fn is_known(&self, name: &str) -> Result<bool> {
        let table = self.table()?;
        Ok(table.folded.contains(&fold_name(name)))
    }

    /// All display names in sorted order
    ///
    /// # Errors
    /// Returns an error if the table cannot be loaded
    pub fn known_names(&self) -> Result<&[String]> {
        Ok(&self.table()?.display)
    }

    fn suggest(table: &NameTable, name: &str) -> Option<String> {
        let folded = fold_name(name);
        if folded.is_empty() {
            return None;
        }
        table
            .display
            .iter()
            .map(|candidate| (candidate, normalized_levenshtein(&folded, &fold_name(candidate))))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate.clone())
    }
}

impl Default for LanguageValidator {
    fn default() -> Self {
        Self::new(BuiltinLanguageNames, DEFAULT_LOCALE)
    }
}
