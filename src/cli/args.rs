//! CLI argument definitions
//!
//! All Clap derive structs for `phasegate` command-line parsing.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::gate::GateMode;
use crate::observability::LogFormat;
use crate::types::{DeadlineType, WorkflowType};

// ============================================================================
// Root CLI
// ============================================================================

/// Deadline evaluation and phase-gated enforcement for academic workflows.
#[derive(Parser, Debug)]
#[command(name = "phasegate", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "PHASEGATE_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "PHASEGATE_LOG_FORMAT")]
    pub log_format: LogFormat,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a single deadline record at an instant.
    Evaluate(EvaluateArgs),

    /// Ask the enforcement gate whether a subject may act.
    Check(CheckArgs),

    /// Recompute cached overdue and blocked flags.
    Recompute(RecomputeArgs),

    /// List deadline templates.
    Templates(TemplatesArgs),

    /// Validate dataset files.
    Validate(ValidateArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `evaluate`.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// YAML file holding one deadline draft.
    #[arg(short, long)]
    pub record: PathBuf,

    /// Evaluation instant (RFC 3339). Defaults to the current time.
    #[arg(long, env = "PHASEGATE_NOW")]
    pub now: Option<DateTime<Utc>>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Dataset file.
    #[arg(short, long, env = "PHASEGATE_DATA")]
    pub data: PathBuf,

    /// Subject to check.
    #[arg(short, long)]
    pub subject: String,

    /// Action being attempted.
    #[arg(long, default_value = "submission")]
    pub action: DeadlineType,

    /// Failure policy.
    #[arg(long, default_value = "enforcing", env = "PHASEGATE_MODE")]
    pub mode: GateMode,

    /// Evaluation instant (RFC 3339). Defaults to the current time.
    #[arg(long, env = "PHASEGATE_NOW")]
    pub now: Option<DateTime<Utc>>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Write audit events as JSONL to this file.
    #[arg(long, env = "PHASEGATE_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,
}

/// Arguments for `recompute`.
#[derive(Args, Debug)]
pub struct RecomputeArgs {
    /// Dataset file.
    #[arg(short, long, env = "PHASEGATE_DATA")]
    pub data: PathBuf,

    /// Recompute one subject instead of all.
    #[arg(short, long)]
    pub subject: Option<String>,

    /// Evaluation instant (RFC 3339). Defaults to the current time.
    #[arg(long, env = "PHASEGATE_NOW")]
    pub now: Option<DateTime<Utc>>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Write audit events as JSONL to this file.
    #[arg(long, env = "PHASEGATE_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,
}

/// Arguments for `templates`.
#[derive(Args, Debug)]
pub struct TemplatesArgs {
    /// Restrict to one workflow type.
    #[arg(short, long)]
    pub workflow: Option<WorkflowType>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Dataset files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Treat warnings as errors.
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `version`.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_defaults() {
        let cli = Cli::try_parse_from([
            "phasegate", "check", "--data", "d.yaml", "--subject", "6410000001",
        ])
        .unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.action, DeadlineType::Submission);
        assert_eq!(args.mode, GateMode::Enforcing);
        assert_eq!(args.format, OutputFormat::Human);
        assert!(args.now.is_none());
    }

    #[test]
    fn check_parses_mode_and_now() {
        let cli = Cli::try_parse_from([
            "phasegate",
            "check",
            "-d",
            "d.yaml",
            "-s",
            "x",
            "--mode",
            "advisory",
            "--action",
            "milestone",
            "--now",
            "2024-08-01T17:30:00Z",
        ])
        .unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.mode, GateMode::Advisory);
        assert_eq!(args.action, DeadlineType::Milestone);
        assert_eq!(
            args.now.unwrap().to_rfc3339(),
            "2024-08-01T17:30:00+00:00"
        );
    }

    #[test]
    fn invalid_now_rejected() {
        let result = Cli::try_parse_from([
            "phasegate", "evaluate", "--record", "r.yaml", "--now", "yesterday",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn validate_requires_files() {
        assert!(Cli::try_parse_from(["phasegate", "validate"]).is_err());
    }

    #[test]
    fn templates_workflow_filter() {
        let cli =
            Cli::try_parse_from(["phasegate", "templates", "--workflow", "project2"]).unwrap();
        let Commands::Templates(args) = cli.command else {
            panic!("expected templates");
        };
        assert_eq!(args.workflow, Some(WorkflowType::Project2));
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["phasegate", "-vvv", "version"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn help_output() {
        let err = Cli::try_parse_from(["phasegate", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn version_output() {
        let err = Cli::try_parse_from(["phasegate", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
