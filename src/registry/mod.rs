//! Phase registry
//!
//! Static lookups from a workflow phase to its workflow type and to the
//! deadline template that phase expects. Nothing here performs I/O or holds
//! mutable state; every table is compiled into the binary.
//!
//! # Architecture
//!
//! - [`phases`]: closed phase enums per workflow type
//! - [`templates`]: static [`DeadlineTemplate`] tables and the exhaustive
//!   phase-to-template mapping
//!
//! A phase that cannot be classified is not an error. Callers treat `None`
//! as "no enforcement for this phase".

pub mod phases;
pub mod templates;

pub use phases::{InternshipPhase, Project1Phase, Project2Phase, WorkflowPhase, all_phase_names};
pub use templates::DeadlineTemplate;

use crate::types::WorkflowType;

/// Classifies a phase name into its workflow type.
///
/// Project1 and project2 are checked through their disjoint membership
/// lists; internship phases are looked up in their own table afterwards.
/// Unknown phases yield `None`.
#[must_use]
pub fn resolve_workflow_type(phase: &str) -> Option<WorkflowType> {
    WorkflowPhase::parse(phase).map(WorkflowPhase::workflow_type)
}

/// Resolves a phase name, preferring the subject's declared workflow type.
///
/// When `hint` is set the name is first parsed within that workflow; only if
/// that fails is the context-free classification used. This is how an
/// internship subject in `IN_PROGRESS` keeps its internship meaning.
#[must_use]
pub fn classify(hint: Option<WorkflowType>, phase: &str) -> Option<WorkflowPhase> {
    hint.and_then(|wt| WorkflowPhase::parse_in(wt, phase))
        .or_else(|| WorkflowPhase::parse(phase))
}

/// Looks up the deadline template for `phase` within `workflow_type`.
///
/// Returns `None` when the phase does not belong to the workflow or when the
/// phase legitimately carries no deadline.
#[must_use]
pub fn resolve_deadline_template(
    workflow_type: WorkflowType,
    phase: &str,
) -> Option<&'static DeadlineTemplate> {
    WorkflowPhase::parse_in(workflow_type, phase).and_then(templates::template_for)
}

/// Template ids of a workflow type, in table order.
#[must_use]
pub fn list_template_ids(workflow_type: WorkflowType) -> Vec<&'static str> {
    templates::templates(workflow_type)
        .iter()
        .map(|t| t.template_id)
        .collect()
}

/// Finds a template by id across all workflow types.
#[must_use]
pub fn template_by_id(template_id: &str) -> Option<&'static DeadlineTemplate> {
    WorkflowType::ALL
        .iter()
        .flat_map(|wt| templates::templates(*wt).iter().copied())
        .find(|t| t.template_id == template_id)
}

/// Suggests the closest known phase name for a misspelled one.
///
/// Uses Jaro-Winkler similarity; returns `None` when nothing is close.
#[must_use]
pub fn suggest_phase(name: &str) -> Option<&'static str> {
    const THRESHOLD: f64 = 0.85;
    let upper = name.to_ascii_uppercase();
    all_phase_names()
        .into_iter()
        .map(|candidate| (candidate, strsim::jaro_winkler(&upper, candidate)))
        .filter(|(_, score)| *score >= THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(candidate, _)| candidate)
}
