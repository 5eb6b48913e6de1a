//! `phasegate check`: ask the enforcement gate about one subject.

use crate::cli::args::{CheckArgs, OutputFormat};
use crate::display::LocalDisplay;
use crate::error::PhaseGateError;
use crate::gate::EnforcementGate;

/// Runs one gate check and prints the decision.
///
/// # Errors
///
/// Returns [`PhaseGateError::Denied`] when the decision denies, or an error
/// if the dataset or event file cannot be opened.
pub async fn run(args: &CheckArgs) -> Result<(), PhaseGateError> {
    let dataset = super::load_dataset(&args.data)?;
    let now = super::resolve_now(args.now);

    let mut gate = EnforcementGate::new(dataset.store.clone(), dataset.store.clone());
    if let Some(events) = super::open_events(args.events_file.as_deref())? {
        gate = gate.with_events(events);
    }

    let decision = gate
        .check_before_action(&args.subject, args.action, args.mode, now)
        .await;

    match args.format {
        OutputFormat::Human => {
            let display = LocalDisplay::from_hours(dataset.config.settings.display_offset_hours);
            println!("subject:  {}", args.subject);
            println!("{}", display.decision(&decision));
        }
        OutputFormat::Json => super::print_json(&decision)?,
    }

    if decision.allow {
        Ok(())
    } else {
        Err(PhaseGateError::Denied {
            subject_id: args.subject.clone(),
        })
    }
}
