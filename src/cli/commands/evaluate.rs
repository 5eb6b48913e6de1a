//! `phasegate evaluate`: run the resolver on one record file.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::args::{EvaluateArgs, OutputFormat};
use crate::config::ConfigLoader;
use crate::display::LocalDisplay;
use crate::error::PhaseGateError;
use crate::resolver::{DeadlineStatus, evaluate};

#[derive(Serialize)]
struct EvaluateOutput<'a> {
    deadline_id: &'a str,
    name: &'a str,
    now: DateTime<Utc>,
    effective_deadline: DateTime<Utc>,
    normalized: Vec<&'static str>,
    #[serde(flatten)]
    status: &'a DeadlineStatus,
}

/// Normalizes the draft, evaluates it at `--now`, and prints the status.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the draft is invalid.
pub fn run(args: &EvaluateArgs) -> Result<(), PhaseGateError> {
    let (draft, warnings) = ConfigLoader::default().load_draft(&args.record)?;
    super::log_warnings(&warnings);

    let normalized = draft.normalization_changes();
    if !normalized.is_empty() {
        tracing::warn!(
            deadline_id = %draft.id,
            fields = ?normalized,
            "announcement normalization overrides requested values"
        );
    }

    let record = draft.into_record()?;
    let now = super::resolve_now(args.now);
    let status = evaluate(Some(&record), now);

    match args.format {
        OutputFormat::Human => {
            let display = LocalDisplay::bangkok();
            println!("{} ({})", record.name, record.id);
            println!("  now:      {}", display.datetime(now));
            println!("  deadline: {}", display.datetime(record.effective_deadline()));
            println!("  status:   {}", display.status(&status));
        }
        OutputFormat::Json => super::print_json(&EvaluateOutput {
            deadline_id: &record.id,
            name: &record.name,
            now,
            effective_deadline: record.effective_deadline(),
            normalized,
            status: &status,
        })?,
    }

    Ok(())
}
