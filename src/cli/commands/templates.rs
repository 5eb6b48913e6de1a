//! `phasegate templates`: list the static deadline templates.

use serde::Serialize;

use crate::cli::args::{OutputFormat, TemplatesArgs};
use crate::error::PhaseGateError;
use crate::registry::{DeadlineTemplate, list_template_ids, template_by_id};
use crate::types::WorkflowType;

#[derive(Serialize)]
struct WorkflowTemplates {
    workflow_type: WorkflowType,
    templates: Vec<&'static DeadlineTemplate>,
}

/// Prints templates for one workflow type, or all of them.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(args: &TemplatesArgs) -> Result<(), PhaseGateError> {
    let selected: Vec<WorkflowType> = args
        .workflow
        .map_or_else(|| WorkflowType::ALL.to_vec(), |wt| vec![wt]);

    match args.format {
        OutputFormat::Human => {
            for wt in selected {
                println!("{wt}:");
                for t in templates_of(wt) {
                    println!(
                        "  {:<40} {:<12} {:<24}{}{}",
                        t.template_id,
                        t.deadline_type.as_str(),
                        t.document_subtype.unwrap_or("-"),
                        if t.is_required { " required" } else { "" },
                        if t.block_if_locked { " blocking" } else { "" },
                    );
                }
            }
        }
        OutputFormat::Json => {
            let out: Vec<WorkflowTemplates> = selected
                .into_iter()
                .map(|workflow_type| WorkflowTemplates {
                    workflow_type,
                    templates: templates_of(workflow_type),
                })
                .collect();
            super::print_json(&out)?;
        }
    }
    Ok(())
}

/// Templates of a workflow type, in registry order.
fn templates_of(workflow_type: WorkflowType) -> Vec<&'static DeadlineTemplate> {
    list_template_ids(workflow_type)
        .into_iter()
        .filter_map(template_by_id)
        .collect()
}
