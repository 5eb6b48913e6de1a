//! Deadline records and creation-time normalization.
//!
//! Records are owned by an external admin surface; this crate only reads
//! them. [`DeadlineDraft`] models what that surface submits on creation so
//! the announcement normalization and window checks live next to the type
//! they protect.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::types::{DeadlineType, WorkflowType};

/// A staff-configured deadline for one academic year and semester.
///
/// Read-only to this crate. Records reaching the resolver are assumed to be
/// normalized already (see [`DeadlineDraft::into_record`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineRecord {
    /// Record identifier.
    pub id: String,
    /// Human-readable deadline name.
    pub name: String,
    /// Workflow the deadline applies to.
    pub related_to: WorkflowType,
    /// Category of the deadline.
    pub deadline_type: DeadlineType,
    /// Academic year (Buddhist era, e.g. 2567).
    pub academic_year: u32,
    /// Semester within the academic year.
    pub semester: u8,
    /// Nominal deadline.
    pub deadline_at: DateTime<Utc>,
    /// Submission window start (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_start_at: Option<DateTime<Utc>>,
    /// Submission window end (inclusive; closed strictly after).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_end_at: Option<DateTime<Utc>>,
    /// Buffer after `deadline_at` during which action is still on time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period_minutes: Option<u32>,
    /// Late action is permitted (and flagged) after the effective deadline.
    pub allow_late: bool,
    /// Action is refused outright after the effective deadline.
    pub lock_after_deadline: bool,
    /// Staff toggle for the submission inbox.
    pub accepting_submissions: bool,
    /// Unpublished records are invisible to students.
    pub is_published: bool,
    /// Document subtype this deadline covers, if specific.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_subtype: Option<String>,
}

impl DeadlineRecord {
    /// `deadline_at + grace_period_minutes`.
    ///
    /// Saturates at the maximum representable instant instead of
    /// overflowing.
    #[must_use]
    pub fn effective_deadline(&self) -> DateTime<Utc> {
        let grace = TimeDelta::minutes(i64::from(self.grace_period_minutes.unwrap_or(0)));
        self.deadline_at
            .checked_add_signed(grace)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Whether the record's subtype matches `subtype` exactly.
    ///
    /// A template without a subtype matches records without one.
    #[must_use]
    pub fn subtype_matches(&self, subtype: Option<&str>) -> bool {
        self.document_subtype.as_deref() == subtype
    }
}

const fn default_true() -> bool {
    true
}

/// A deadline as requested by the admin surface, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineDraft {
    /// Record identifier.
    pub id: String,
    /// Human-readable deadline name.
    pub name: String,
    /// Workflow the deadline applies to.
    pub related_to: WorkflowType,
    /// Category of the deadline.
    pub deadline_type: DeadlineType,
    /// Academic year.
    pub academic_year: u32,
    /// Semester.
    pub semester: u8,
    /// Nominal deadline.
    pub deadline_at: DateTime<Utc>,
    /// Requested window start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_start_at: Option<DateTime<Utc>>,
    /// Requested window end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_end_at: Option<DateTime<Utc>>,
    /// Requested grace period in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period_minutes: Option<i64>,
    /// Requested late policy.
    #[serde(default)]
    pub allow_late: bool,
    /// Requested lock policy.
    #[serde(default)]
    pub lock_after_deadline: bool,
    /// Requested inbox state.
    #[serde(default = "default_true")]
    pub accepting_submissions: bool,
    /// Requested visibility.
    #[serde(default = "default_true")]
    pub is_published: bool,
    /// Document subtype.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_subtype: Option<String>,
}

impl DeadlineDraft {
    /// Fields that normalization will override, by name.
    ///
    /// Announcements never accept submissions and carry no late or lock
    /// policy; any such request is silently dropped on creation.
    #[must_use]
    pub fn normalization_changes(&self) -> Vec<&'static str> {
        if self.deadline_type != DeadlineType::Announcement {
            return Vec::new();
        }
        let mut changed = Vec::new();
        if self.accepting_submissions {
            changed.push("accepting_submissions");
        }
        if self.allow_late {
            changed.push("allow_late");
        }
        if self.lock_after_deadline {
            changed.push("lock_after_deadline");
        }
        changed
    }

    /// Validates and normalizes the draft into a stored record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when the id is empty, the grace period is
    /// negative or too large, or the window starts after it ends.
    pub fn into_record(self) -> Result<DeadlineRecord, RecordError> {
        if self.id.trim().is_empty() {
            return Err(RecordError::EmptyId);
        }

        let grace_period_minutes = match self.grace_period_minutes {
            None => None,
            Some(minutes) if minutes < 0 => {
                return Err(RecordError::NegativeGrace {
                    id: self.id,
                    minutes,
                });
            }
            Some(minutes) => Some(u32::try_from(minutes).map_err(|_| {
                RecordError::GraceTooLarge {
                    id: self.id.clone(),
                    minutes,
                }
            })?),
        };

        if let (Some(start), Some(end)) = (self.window_start_at, self.window_end_at) {
            if start > end {
                return Err(RecordError::InvertedWindow {
                    id: self.id,
                    start: start.to_rfc3339(),
                    end: end.to_rfc3339(),
                });
            }
        }

        let announcement = self.deadline_type == DeadlineType::Announcement;

        Ok(DeadlineRecord {
            id: self.id,
            name: self.name,
            related_to: self.related_to,
            deadline_type: self.deadline_type,
            academic_year: self.academic_year,
            semester: self.semester,
            deadline_at: self.deadline_at,
            window_start_at: self.window_start_at,
            window_end_at: self.window_end_at,
            grace_period_minutes,
            allow_late: self.allow_late && !announcement,
            lock_after_deadline: self.lock_after_deadline && !announcement,
            accepting_submissions: self.accepting_submissions && !announcement,
            is_published: self.is_published,
            document_subtype: self.document_subtype,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn draft(deadline_type: DeadlineType) -> DeadlineDraft {
        DeadlineDraft {
            id: "d1".to_string(),
            name: "Topic proposal".to_string(),
            related_to: WorkflowType::Project1,
            deadline_type,
            academic_year: 2567,
            semester: 1,
            deadline_at: t("2024-08-01T17:00:00Z"),
            window_start_at: None,
            window_end_at: None,
            grace_period_minutes: Some(30),
            allow_late: true,
            lock_after_deadline: false,
            accepting_submissions: true,
            is_published: true,
            document_subtype: Some("TOPIC_PROPOSAL".to_string()),
        }
    }

    #[test]
    fn announcement_forces_flags_off() {
        let record = draft(DeadlineType::Announcement).into_record().unwrap();
        assert!(!record.allow_late);
        assert!(!record.lock_after_deadline);
        assert!(!record.accepting_submissions);
    }

    #[test]
    fn announcement_reports_changes() {
        let mut d = draft(DeadlineType::Announcement);
        d.lock_after_deadline = true;
        assert_eq!(
            d.normalization_changes(),
            vec!["accepting_submissions", "allow_late", "lock_after_deadline"]
        );
    }

    #[test]
    fn submission_keeps_requested_flags() {
        let d = draft(DeadlineType::Submission);
        assert!(d.normalization_changes().is_empty());
        let record = d.into_record().unwrap();
        assert!(record.allow_late);
        assert!(record.accepting_submissions);
    }

    #[test]
    fn inverted_window_rejected() {
        let mut d = draft(DeadlineType::Submission);
        d.window_start_at = Some(t("2024-08-02T00:00:00Z"));
        d.window_end_at = Some(t("2024-08-01T00:00:00Z"));
        assert!(matches!(
            d.into_record(),
            Err(RecordError::InvertedWindow { .. })
        ));
    }

    #[test]
    fn equal_window_bounds_accepted() {
        let mut d = draft(DeadlineType::Submission);
        d.window_start_at = Some(t("2024-08-01T00:00:00Z"));
        d.window_end_at = Some(t("2024-08-01T00:00:00Z"));
        assert!(d.into_record().is_ok());
    }

    #[test]
    fn negative_grace_rejected() {
        let mut d = draft(DeadlineType::Submission);
        d.grace_period_minutes = Some(-5);
        assert_eq!(
            d.into_record(),
            Err(RecordError::NegativeGrace {
                id: "d1".to_string(),
                minutes: -5
            })
        );
    }

    #[test]
    fn oversized_grace_rejected_as_too_large() {
        let mut d = draft(DeadlineType::Submission);
        d.grace_period_minutes = Some(5_000_000_000);
        let err = d.into_record().unwrap_err();
        assert_eq!(
            err,
            RecordError::GraceTooLarge {
                id: "d1".to_string(),
                minutes: 5_000_000_000
            }
        );
        assert_eq!(
            err.to_string(),
            "deadline 'd1': grace period of 5000000000 minutes is too large"
        );
    }

    #[test]
    fn largest_grace_accepted() {
        let mut d = draft(DeadlineType::Submission);
        d.grace_period_minutes = Some(i64::from(u32::MAX));
        let record = d.into_record().unwrap();
        assert_eq!(record.grace_period_minutes, Some(u32::MAX));
    }

    #[test]
    fn empty_id_rejected() {
        let mut d = draft(DeadlineType::Submission);
        d.id = "  ".to_string();
        assert_eq!(d.into_record(), Err(RecordError::EmptyId));
    }

    #[test]
    fn effective_deadline_adds_grace() {
        let record = draft(DeadlineType::Submission).into_record().unwrap();
        assert_eq!(record.effective_deadline(), t("2024-08-01T17:30:00Z"));
    }

    #[test]
    fn effective_deadline_without_grace() {
        let mut record = draft(DeadlineType::Submission).into_record().unwrap();
        record.grace_period_minutes = None;
        assert_eq!(record.effective_deadline(), record.deadline_at);
    }

    #[test]
    fn effective_deadline_saturates() {
        let mut record = draft(DeadlineType::Submission).into_record().unwrap();
        record.deadline_at = DateTime::<Utc>::MAX_UTC;
        assert_eq!(record.effective_deadline(), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn draft_defaults_from_yaml() {
        let yaml = r"
id: x
name: Kickoff
related_to: project1
deadline_type: ANNOUNCEMENT
academic_year: 2567
semester: 2
deadline_at: 2024-11-01T02:00:00Z
";
        let d: DeadlineDraft = serde_yaml::from_str(yaml).unwrap();
        assert!(d.accepting_submissions);
        assert!(d.is_published);
        assert!(!d.allow_late);
        assert_eq!(d.grace_period_minutes, None);
    }

    #[test]
    fn subtype_matching() {
        let record = draft(DeadlineType::Submission).into_record().unwrap();
        assert!(record.subtype_matches(Some("TOPIC_PROPOSAL")));
        assert!(!record.subtype_matches(Some("THESIS_DRAFT")));
        assert!(!record.subtype_matches(None));
    }
}
