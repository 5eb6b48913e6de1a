//! Per-subject workflow state and overdue summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resolver::DeadlineRecord;
use crate::types::WorkflowType;

/// Persisted workflow state of one subject (student).
///
/// `current_phase` is owned by external approval workflows and is stored
/// as the raw phase name so unknown phases survive a round trip.
/// `is_overdue` and `is_blocked` are derived caches: only
/// [`WorkflowStateTracker`](super::WorkflowStateTracker) writes them, and
/// they may lag the truth until the next recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Subject (student) identifier.
    pub subject_id: String,
    /// Workflow the subject is enrolled in.
    pub workflow_type: WorkflowType,
    /// Raw phase name as written by the approval workflow.
    pub current_phase: String,
    /// Enrollment academic year.
    pub academic_year: u32,
    /// Enrollment semester.
    pub semester: u8,
    /// Cached: a blocking deadline for the current phase is locked.
    #[serde(default)]
    pub is_blocked: bool,
    /// Cached: some submission deadline is past its effective deadline.
    #[serde(default)]
    pub is_overdue: bool,
    /// Last recorded activity, maintained externally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// A submission deadline found past its effective deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueDeadline {
    /// Record id.
    pub deadline_id: String,
    /// Record name.
    pub name: String,
    /// Deadline plus grace.
    pub effective_deadline: DateTime<Utc>,
    /// Whole minutes past the effective deadline.
    pub minutes_late: i64,
    /// Late submission is refused.
    pub locked: bool,
}

/// Result of one overdue recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueSummary {
    /// Subject the summary belongs to.
    pub subject_id: String,
    /// Recomputed overdue flag.
    pub is_overdue: bool,
    /// Recomputed blocked flag.
    pub is_blocked: bool,
    /// Submission deadlines past their effective deadline.
    pub overdue_deadlines: Vec<OverdueDeadline>,
    /// Earliest applicable deadline still in the future.
    pub next_deadline: Option<DeadlineRecord>,
    /// Whether the overdue flag was written this time.
    pub overdue_written: bool,
    /// Whether the blocked flag was written this time.
    pub blocked_written: bool,
}

impl OverdueSummary {
    /// Summary for a subject with nothing applicable.
    #[must_use]
    pub fn empty(subject_id: &str) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            is_overdue: false,
            is_blocked: false,
            overdue_deadlines: Vec::new(),
            next_deadline: None,
            overdue_written: false,
            blocked_written: false,
        }
    }
}

/// Totals from recomputing every subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Subjects recomputed successfully.
    pub processed: usize,
    /// Subjects found overdue.
    pub overdue: usize,
    /// Subjects found blocked.
    pub blocked: usize,
    /// Flag writes issued.
    pub writes: usize,
    /// Subjects whose recompute failed.
    pub failures: usize,
}
