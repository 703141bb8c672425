//! Outgoing CLI - command line interface and HTTP service for the catalogue
//! of Thomas Mann's outgoing correspondence

use anyhow::{Context, Result};
use clap::Parser;
use outgoing_cli::{
    execute, http,
    logging::{init_logging, LogOptions},
    print_languages, Cli, Commands,
};
use outgoing_core::CorrespondenceStore;
use std::sync::Arc;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = cli
        .resolve_config()
        .context("Failed to load configuration")?;

    let _log_guard = init_logging(&LogOptions {
        verbose: cli.verbose,
        json: cli.json_logs,
        log_dir: config.log_dir.clone(),
    })?;

    match &cli.command {
        Commands::Languages { filter } => {
            print_languages(
                &config.language_validator(),
                filter.as_deref(),
                &mut std::io::stdout(),
            )?;
        }
        Commands::Serve { .. } => {
            let store = Arc::new(CorrespondenceStore::open(&config).with_context(|| {
                format!("Failed to open {}", config.table_path.display())
            })?);

            http::serve(Arc::clone(&store), &config.bind_address())
                .await
                .with_context(|| format!("Failed to serve on {}", config.bind_address()))?;

            match Arc::try_unwrap(store) {
                Ok(store) => store.close()?,
                Err(_) => warn!("Store still in use at shutdown, skipping final flush"),
            }
        }
        command => {
            let store = CorrespondenceStore::open(&config).with_context(|| {
                format!("Failed to open {}", config.table_path.display())
            })?;
            execute(command, &store, &mut std::io::stdout())?;
        }
    }

    Ok(())
}
