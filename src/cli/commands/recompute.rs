//! `phasegate recompute`: refresh cached overdue and blocked flags.

use crate::cli::args::{OutputFormat, RecomputeArgs};
use crate::display::LocalDisplay;
use crate::error::PhaseGateError;
use crate::tracker::{OverdueSummary, WorkflowStateTracker};

/// Recomputes one subject or every subject in the dataset.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded or the store fails.
pub async fn run(args: &RecomputeArgs) -> Result<(), PhaseGateError> {
    let dataset = super::load_dataset(&args.data)?;
    let now = super::resolve_now(args.now);
    let display = LocalDisplay::from_hours(dataset.config.settings.display_offset_hours);

    let mut tracker = WorkflowStateTracker::new(dataset.store.clone(), dataset.store.clone());
    if let Some(events) = super::open_events(args.events_file.as_deref())? {
        tracker = tracker.with_events(events);
    }

    if let Some(subject_id) = &args.subject {
        let summary = tracker.recompute_overdue(subject_id, now).await?;
        match args.format {
            OutputFormat::Human => print_summary(&summary, &display),
            OutputFormat::Json => super::print_json(&summary)?,
        }
        return Ok(());
    }

    let batch = tracker.recompute_all(now).await?;
    match args.format {
        OutputFormat::Human => {
            println!(
                "{} subjects recomputed: {} overdue, {} blocked, {} flag writes, {} failures",
                batch.processed, batch.overdue, batch.blocked, batch.writes, batch.failures
            );
        }
        OutputFormat::Json => super::print_json(&batch)?,
    }
    Ok(())
}

fn print_summary(summary: &OverdueSummary, display: &LocalDisplay) {
    println!("subject:  {}", summary.subject_id);
    println!(
        "overdue:  {}{}",
        summary.is_overdue,
        if summary.overdue_written { " (updated)" } else { "" }
    );
    println!(
        "blocked:  {}{}",
        summary.is_blocked,
        if summary.blocked_written { " (updated)" } else { "" }
    );
    for overdue in &summary.overdue_deadlines {
        println!(
            "  - {} ({}): {} late, due {}{}",
            overdue.name,
            overdue.deadline_id,
            crate::display::minutes(overdue.minutes_late),
            display.datetime(overdue.effective_deadline),
            if overdue.locked { ", locked" } else { "" }
        );
    }
    if let Some(next) = &summary.next_deadline {
        println!("next:     {} on {}", next.name, display.date(next.deadline_at));
    }
}
