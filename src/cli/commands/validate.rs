//! `phasegate validate`: check dataset files without evaluating anything.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::ConfigLoader;
use crate::error::{ConfigError, PhaseGateError, Severity, ValidationIssue};

#[derive(Serialize)]
struct FileReport {
    file: PathBuf,
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Validates every file, reporting all of them before failing.
///
/// # Errors
///
/// Returns a validation error if any file has errors, or warnings under
/// `--strict`.
pub fn run(args: &ValidateArgs) -> Result<(), PhaseGateError> {
    let loader = ConfigLoader::default();
    let mut reports = Vec::with_capacity(args.files.len());

    for path in &args.files {
        tracing::info!(file = %path.display(), "validating dataset");
        let report = match loader.load(path) {
            Ok(result) => {
                let warnings: Vec<String> =
                    result.warnings.iter().map(ToString::to_string).collect();
                FileReport {
                    file: path.clone(),
                    valid: !(args.strict && !warnings.is_empty()),
                    errors: Vec::new(),
                    warnings,
                }
            }
            Err(ConfigError::ValidationError { errors, .. }) => FileReport {
                file: path.clone(),
                valid: false,
                errors: errors.iter().map(ToString::to_string).collect(),
                warnings: Vec::new(),
            },
            Err(e) => FileReport {
                file: path.clone(),
                valid: false,
                errors: vec![e.to_string()],
                warnings: Vec::new(),
            },
        };
        reports.push(report);
    }

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                let mark = if report.valid { "ok" } else { "FAILED" };
                println!("{}: {mark}", report.file.display());
                for line in report.errors.iter().chain(&report.warnings) {
                    println!("  {line}");
                }
            }
        }
        OutputFormat::Json => super::print_json(&reports)?,
    }

    let failed: Vec<ValidationIssue> = reports
        .iter()
        .filter(|r| !r.valid)
        .map(|r| ValidationIssue {
            path: r.file.display().to_string(),
            message: if r.errors.is_empty() {
                "warnings present in strict mode".to_string()
            } else {
                format!("{} error(s)", r.errors.len())
            },
            severity: Severity::Error,
        })
        .collect();

    if failed.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            path: failed
                .iter()
                .map(|issue| issue.path.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            errors: failed,
        }
        .into())
    }
}
