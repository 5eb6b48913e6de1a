//! Error types for `phasegate`
//!
//! Deadline evaluation itself never fails: the resolver always returns a
//! status. The errors here cover dataset loading, the persistence
//! collaborators, and record construction.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `phasegate` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Persistence collaborator failed
    pub const STORE_ERROR: i32 = 4;

    /// The enforcement gate denied the action
    pub const DENIED: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `phasegate` operations.
///
/// Aggregates the domain-specific errors and maps each to an exit code.
#[derive(Debug, Error)]
pub enum PhaseGateError {
    /// Dataset loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Persistence collaborator error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Deadline record could not be constructed
    #[error(transparent)]
    Record(#[from] RecordError),

    /// The enforcement gate denied the checked action
    #[error("action denied for subject {subject_id}")]
    Denied {
        /// Subject the check was for
        subject_id: String,
    },

    /// Invalid command-line usage
    #[error("usage error: {0}")]
    Usage(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PhaseGateError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Record(_) | Self::Json(_) | Self::Yaml(_) => {
                ExitCode::CONFIG_ERROR
            }
            Self::Store(_) => ExitCode::STORE_ERROR,
            Self::Denied { .. } => ExitCode::DENIED,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Dataset loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the dataset file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Dataset validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the dataset file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced dataset file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// Environment variable referenced in the dataset is not set
    #[error("environment variable '{var}' not set (referenced at {location})")]
    EnvVarNotSet {
        /// Name of the environment variable
        var: String,
        /// Location or message attached to the reference
        location: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found while validating a dataset.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "deadlines[2].window_end_at")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Prevents the dataset from being used
    Error,
    /// Reported, but the dataset still loads
    Warning,
}

// ============================================================================
// Store Errors
// ============================================================================

/// Failures reported by the persistence collaborators.
///
/// Every variant is an infrastructure failure from the gate's point of view.
/// None of these messages may reach a user-facing decision payload.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A read query failed
    #[error("query failed: {0}")]
    Query(String),

    /// A write failed
    #[error("write failed for subject {subject_id}: {message}")]
    Write {
        /// Subject whose cached flags were being written
        subject_id: String,
        /// Backend error message
        message: String,
    },
}

// ============================================================================
// Record Errors
// ============================================================================

/// A deadline draft that cannot become a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// `window_start_at` is after `window_end_at`
    #[error("deadline '{id}': window starts at {start} but ends at {end}")]
    InvertedWindow {
        /// Record id
        id: String,
        /// Requested window start (RFC 3339)
        start: String,
        /// Requested window end (RFC 3339)
        end: String,
    },

    /// Grace period is negative
    #[error("deadline '{id}': grace period must not be negative (got {minutes} minutes)")]
    NegativeGrace {
        /// Record id
        id: String,
        /// Requested grace period
        minutes: i64,
    },

    /// Grace period does not fit in `u32` minutes
    #[error("deadline '{id}': grace period of {minutes} minutes is too large")]
    GraceTooLarge {
        /// Record id
        id: String,
        /// Requested grace period
        minutes: i64,
    },

    /// Record id is empty
    #[error("deadline id must not be empty")]
    EmptyId,
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `phasegate` operations.
pub type Result<T> = std::result::Result<T, PhaseGateError>;

// ============================================================================
// Tests
// ============================================================================
