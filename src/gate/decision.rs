//! Gate decisions and their diagnostics.
//!
//! A [`Decision`] is the only thing the gate hands back to a caller. Its
//! diagnostics carry the timestamps and deadline name needed to render an
//! actionable message, and never any internal error text.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::resolver::DeadlineStatus;
use crate::store::MatchKind;
use crate::types::WorkflowType;

/// Failure policy of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GateMode {
    /// Guards a mutating action: denies on any blocking status and fails
    /// closed on infrastructure errors.
    #[default]
    Enforcing,
    /// Annotates a read: never denies and fails open without annotation.
    Advisory,
}

impl GateMode {
    /// Label used in logs, metrics and events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enforcing => "enforcing",
            Self::Advisory => "advisory",
        }
    }
}

impl std::fmt::Display for GateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Externally visible denial code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenialCode {
    /// Submission window has not opened.
    WindowNotOpen,
    /// Submission window has closed.
    WindowClosed,
    /// Past the effective deadline and late action is refused.
    DeadlinePassed,
}

impl DenialCode {
    /// Wire name, e.g. `DEADLINE_PASSED`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WindowNotOpen => "WINDOW_NOT_OPEN",
            Self::WindowClosed => "WINDOW_CLOSED",
            Self::DeadlinePassed => "DEADLINE_PASSED",
        }
    }
}

/// Why a diagnostic was attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticReason {
    /// Subject or phase has no workflow mapping; enforcement is disabled.
    NoMapping,
    /// Phase carries no deadline template.
    NoTemplate,
    /// Denied (or, in advisory mode, annotated) before the window opens.
    WindowNotOpen,
    /// Denied (or annotated) after the window closes.
    WindowClosed,
    /// Denied (or annotated) after the effective deadline.
    DeadlinePassed,
    /// Allowed, but the resulting submission must be flagged late.
    LateSubmission,
    /// Persistence failed; details are only in the logs.
    Unavailable,
}

impl DiagnosticReason {
    /// Snake-case label used in logs and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoMapping => "no_mapping",
            Self::NoTemplate => "no_template",
            Self::WindowNotOpen => "window_not_open",
            Self::WindowClosed => "window_closed",
            Self::DeadlinePassed => "deadline_passed",
            Self::LateSubmission => "late_submission",
            Self::Unavailable => "unavailable",
        }
    }
}

/// Which policy flag produced a `DEADLINE_PASSED` denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockReason {
    /// `lock_after_deadline` is set.
    LockedAfterDeadline,
    /// `allow_late` is unset.
    LateNotPermitted,
}

/// Structured detail attached to a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Why the diagnostic is attached.
    pub reason: DiagnosticReason,
    /// Denial code, set for denying statuses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<DenialCode>,
    /// Record that was evaluated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_id: Option<String>,
    /// Record name, for user-facing messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_name: Option<String>,
    /// Window start, when the window has not opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opens_at: Option<DateTime<Utc>>,
    /// Window end, when the window has closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    /// Deadline plus grace, when past it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_deadline: Option<DateTime<Utc>>,
    /// Whole minutes past the effective deadline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes_late: Option<i64>,
    /// Policy flag behind a `DEADLINE_PASSED` denial.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_reason: Option<LockReason>,
    /// Workflow of the subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_type: Option<WorkflowType>,
    /// Raw phase name of the subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    /// How the record was selected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_kind: Option<MatchKind>,
}

impl Diagnostics {
    /// Diagnostics carrying only a reason.
    #[must_use]
    pub const fn new(reason: DiagnosticReason) -> Self {
        Self {
            reason,
            code: None,
            deadline_id: None,
            deadline_name: None,
            opens_at: None,
            closed_at: None,
            effective_deadline: None,
            minutes_late: None,
            lock_reason: None,
            workflow_type: None,
            phase: None,
            match_kind: None,
        }
    }
}

/// Outcome of [`EnforcementGate::check_before_action`](super::EnforcementGate::check_before_action).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Whether the action may proceed.
    pub allow: bool,
    /// Evaluated status; absent when no record lookup happened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeadlineStatus>,
    /// Detail for denials, warnings and lookup gaps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Diagnostics>,
}

impl Decision {
    /// Unconditional allow with nothing attached.
    #[must_use]
    pub const fn allow() -> Self {
        Self {
            allow: true,
            status: None,
            diagnostics: None,
        }
    }

    /// Whether the caller must flag the resulting submission as late.
    #[must_use]
    pub const fn is_late(&self) -> bool {
        matches!(self.status, Some(DeadlineStatus::LateAllowed { .. }))
    }

    /// Denial code, if any.
    #[must_use]
    pub fn code(&self) -> Option<DenialCode> {
        self.diagnostics.as_ref().and_then(|d| d.code)
    }

    /// Diagnostic reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<DiagnosticReason> {
        self.diagnostics.as_ref().map(|d| d.reason)
    }
}
