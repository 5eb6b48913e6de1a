//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod check;
pub mod evaluate;
pub mod recompute;
pub mod templates;
pub mod validate;
pub mod version;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigLoader, DatasetConfig, LoadWarning};
use crate::error::PhaseGateError;
use crate::observability::EventEmitter;
use crate::store::MemoryStore;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), PhaseGateError> {
    match cli.command {
        Commands::Evaluate(args) => evaluate::run(&args),
        Commands::Check(args) => check::run(&args).await,
        Commands::Recompute(args) => recompute::run(&args).await,
        Commands::Templates(args) => templates::run(&args),
        Commands::Validate(args) => validate::run(&args),
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// The evaluation instant: the explicit flag, else the wall clock.
///
/// This is the only place the crate reads the clock.
fn resolve_now(now: Option<DateTime<Utc>>) -> DateTime<Utc> {
    now.unwrap_or_else(Utc::now)
}

/// A loaded dataset and the store built from it.
struct Dataset {
    config: Arc<DatasetConfig>,
    store: Arc<MemoryStore>,
}

/// Loads, validates and materializes a dataset file, logging warnings.
fn load_dataset(path: &Path) -> Result<Dataset, PhaseGateError> {
    tracing::info!(file = %path.display(), "loading dataset");
    let result = ConfigLoader::default().load(path)?;
    log_warnings(&result.warnings);
    let store = Arc::new(result.config.to_store()?);
    Ok(Dataset {
        config: result.config,
        store,
    })
}

fn log_warnings(warnings: &[LoadWarning]) {
    for warning in warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
}

/// Opens the JSONL event sink, if one was requested.
fn open_events(path: Option<&Path>) -> Result<Option<Arc<EventEmitter>>, PhaseGateError> {
    path.map(|p| EventEmitter::from_file(p).map(Arc::new))
        .transpose()
        .map_err(PhaseGateError::from)
}

/// Pretty JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> Result<(), PhaseGateError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
