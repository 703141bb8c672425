//! Logging setup for the `outgoing` binary
//!
//! Log lines go to stderr so command output on stdout stays machine readable.
//! With a log directory configured, a daily rolling JSON log is written too.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix of rolling log files
pub const LOG_FILE_PREFIX: &str = "outgoing.log";

/// Error types for logging setup
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    FilterCompilation(String),

    #[error("Failed to prepare log directory: {0}")]
    LogDirectory(String),

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// Result type for logging setup
pub type Result<T> = std::result::Result<T, LoggingError>;

/// Logging options collected from flags and configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    pub verbose: bool,
    pub json: bool,
    pub log_dir: Option<PathBuf>,
}

/// Filter for the given verbosity
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` applies, falling back to `info`.
///
/// # Errors
/// Returns `LoggingError::FilterCompilation` if `RUST_LOG` cannot be parsed
pub fn build_filter(verbose: bool) -> Result<EnvFilter> {
    if verbose {
        return Ok(EnvFilter::new("debug"));
    }
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .map_err(|e| LoggingError::FilterCompilation(format!("{directives}: {e}"))),
        _ => Ok(EnvFilter::new("info")),
    }
}

/// Install the global subscriber
///
/// The returned guard flushes the file writer when dropped and must be held
/// for the lifetime of the program.
///
/// # Errors
/// Returns an error if the filter is invalid, the log directory cannot be
/// created, or a subscriber is already installed
pub fn init_logging(options: &LogOptions) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(options.verbose)?;

    let (file_writer, guard) = match &options.log_dir {
        Some(dir) => {
            let (writer, guard) = rolling_writer(dir)?;
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let json_layer = options
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr).with_target(true));
    let text_layer = (!options.json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
    });
    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .with_current_span(true)
            .with_thread_names(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    if let Some(dir) = &options.log_dir {
        info!("File logging initialized: {}", dir.display());
    }
    Ok(guard)
}

fn rolling_writer(
    dir: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)
        .map_err(|e| LoggingError::LogDirectory(format!("{}: {e}", dir.display())))?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}
