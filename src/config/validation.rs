//! Dataset validation
//!
//! Runs on the deserialized [`DatasetConfig`] and collects every issue
//! instead of stopping at the first, so one run reports everything wrong
//! with a file.

use std::collections::HashSet;

use crate::config::loader::ConfigLimits;
use crate::config::schema::DatasetConfig;
use crate::error::{Severity, ValidationIssue};
use crate::registry::{WorkflowPhase, suggest_phase};
use crate::resolver::DeadlineDraft;
use crate::tracker::WorkflowState;

// ============================================================================
// Public API
// ============================================================================

/// Result of dataset validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Dataset validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a dataset and returns every issue found.
    pub fn validate(&mut self, config: &DatasetConfig, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_limits(config, limits);
        self.validate_settings(config);

        let mut ids = HashSet::new();
        for (i, draft) in config.deadlines.iter().enumerate() {
            let path = format!("deadlines[{i}]");
            if !draft.id.is_empty() && !ids.insert(draft.id.as_str()) {
                self.add_error(
                    &format!("{path}.id"),
                    &format!("duplicate deadline id '{}'", draft.id),
                );
            }
            self.validate_deadline(draft, &path);
        }

        let mut subjects = HashSet::new();
        for (i, state) in config.subjects.iter().enumerate() {
            let path = format!("subjects[{i}]");
            if !state.subject_id.is_empty() && !subjects.insert(state.subject_id.as_str()) {
                self.add_error(
                    &format!("{path}.subject_id"),
                    &format!("duplicate subject id '{}'", state.subject_id),
                );
            }
            self.validate_subject(state, &path);
        }

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Sections
    // ========================================================================

    fn validate_limits(&mut self, config: &DatasetConfig, limits: &ConfigLimits) {
        if config.deadlines.len() > limits.max_deadlines {
            self.add_error(
                "deadlines",
                &format!(
                    "too many deadlines: {} (max {})",
                    config.deadlines.len(),
                    limits.max_deadlines
                ),
            );
        }
        if config.subjects.len() > limits.max_subjects {
            self.add_error(
                "subjects",
                &format!(
                    "too many subjects: {} (max {})",
                    config.subjects.len(),
                    limits.max_subjects
                ),
            );
        }
    }

    fn validate_settings(&mut self, config: &DatasetConfig) {
        let offset = config.settings.display_offset_hours;
        if !(-12..=14).contains(&offset) {
            self.add_error(
                "settings.display_offset_hours",
                &format!("display offset {offset} is outside -12..=14 hours"),
            );
        }
    }

    fn validate_deadline(&mut self, draft: &DeadlineDraft, path: &str) {
        if draft.id.trim().is_empty() {
            self.add_error(&format!("{path}.id"), "deadline id is required");
        }
        if draft.name.trim().is_empty() {
            self.add_warning(
                &format!("{path}.name"),
                "deadline name is empty; denial messages will have nothing to show",
            );
        }
        if !(1..=3).contains(&draft.semester) {
            self.add_error(
                &format!("{path}.semester"),
                &format!("semester must be 1, 2 or 3 (got {})", draft.semester),
            );
        }

        if let Some(minutes) = draft.grace_period_minutes {
            if minutes < 0 {
                self.add_error(
                    &format!("{path}.grace_period_minutes"),
                    &format!("grace period must not be negative (got {minutes})"),
                );
            } else if u32::try_from(minutes).is_err() {
                self.add_error(
                    &format!("{path}.grace_period_minutes"),
                    &format!("grace period of {minutes} minutes is too large"),
                );
            }
        }

        if let (Some(start), Some(end)) = (draft.window_start_at, draft.window_end_at) {
            if start > end {
                self.add_error(
                    &format!("{path}.window_start_at"),
                    &format!("window starts at {start} but ends at {end}"),
                );
            }
        }

        if let Some(end) = draft.window_end_at {
            if end < draft.deadline_at {
                self.add_warning(
                    &format!("{path}.window_end_at"),
                    "window closes before the deadline; the window close takes precedence",
                );
            }
        }

        let changes = draft.normalization_changes();
        if !changes.is_empty() {
            self.add_warning(
                path,
                &format!(
                    "announcement '{}' cannot set {}; these will be stored as false",
                    draft.id,
                    changes.join(", ")
                ),
            );
        }
    }

    fn validate_subject(&mut self, state: &WorkflowState, path: &str) {
        if state.subject_id.trim().is_empty() {
            self.add_error(&format!("{path}.subject_id"), "subject id is required");
        }

        let phase_path = format!("{path}.current_phase");
        match WorkflowPhase::parse(&state.current_phase) {
            None => {
                let mut message = format!(
                    "unknown phase '{}'; no deadline will be enforced",
                    state.current_phase
                );
                if let Some(suggestion) = suggest_phase(&state.current_phase) {
                    message.push_str(&format!(" (did you mean '{suggestion}'?)"));
                }
                self.add_warning(&phase_path, &message);
            }
            Some(phase) => {
                if WorkflowPhase::parse_in(state.workflow_type, &state.current_phase).is_none() {
                    self.add_warning(
                        &phase_path,
                        &format!(
                            "phase '{}' belongs to {}, not the declared {}",
                            state.current_phase,
                            phase.workflow_type(),
                            state.workflow_type
                        ),
                    );
                }
            }
        }
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, Utc};

    use super::*;
    use crate::types::{DeadlineType, WorkflowType};

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-08-01T16:59:59Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn draft(id: &str) -> DeadlineDraft {
        DeadlineDraft {
            id: id.to_string(),
            name: "Topic proposal".to_string(),
            related_to: WorkflowType::Project1,
            deadline_type: DeadlineType::Submission,
            academic_year: 2567,
            semester: 1,
            deadline_at: t0(),
            window_start_at: None,
            window_end_at: None,
            grace_period_minutes: None,
            allow_late: false,
            lock_after_deadline: false,
            accepting_submissions: true,
            is_published: true,
            document_subtype: None,
        }
    }

    fn subject(id: &str, workflow_type: WorkflowType, phase: &str) -> WorkflowState {
        WorkflowState {
            subject_id: id.to_string(),
            workflow_type,
            current_phase: phase.to_string(),
            academic_year: 2567,
            semester: 1,
            is_blocked: false,
            is_overdue: false,
            last_activity_at: None,
        }
    }

    fn validate(config: &DatasetConfig) -> ValidationResult {
        Validator::new().validate(config, &ConfigLimits::default())
    }

    #[test]
    fn clean_dataset_passes() {
        let config = DatasetConfig {
            deadlines: vec![draft("a"), draft("b")],
            subjects: vec![subject("s1", WorkflowType::Project1, "DRAFT")],
            ..DatasetConfig::default()
        };
        let result = validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn duplicate_deadline_ids() {
        let config = DatasetConfig {
            deadlines: vec![draft("a"), draft("a")],
            ..DatasetConfig::default()
        };
        let result = validate(&config);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].path, "deadlines[1].id");
    }

    #[test]
    fn inverted_window_is_error() {
        let mut d = draft("a");
        d.window_start_at = Some(t0());
        d.window_end_at = Some(t0() - TimeDelta::hours(1));
        let config = DatasetConfig {
            deadlines: vec![d],
            ..DatasetConfig::default()
        };
        let result = validate(&config);
        assert!(result.has_errors());
        assert_eq!(result.errors[0].path, "deadlines[0].window_start_at");
    }

    #[test]
    fn window_closing_before_deadline_warns() {
        let mut d = draft("a");
        d.window_end_at = Some(t0() - TimeDelta::minutes(10));
        let config = DatasetConfig {
            deadlines: vec![d],
            ..DatasetConfig::default()
        };
        let result = validate(&config);
        assert!(result.is_valid());
        assert_eq!(result.warnings[0].path, "deadlines[0].window_end_at");
    }

    #[test]
    fn negative_grace_is_error() {
        let mut d = draft("a");
        d.grace_period_minutes = Some(-1);
        let config = DatasetConfig {
            deadlines: vec![d],
            ..DatasetConfig::default()
        };
        assert_eq!(validate(&config).errors.len(), 1);
    }

    #[test]
    fn announcement_policy_request_warns() {
        let mut d = draft("kickoff");
        d.deadline_type = DeadlineType::Announcement;
        d.allow_late = true;
        let config = DatasetConfig {
            deadlines: vec![d],
            ..DatasetConfig::default()
        };
        let result = validate(&config);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("allow_late"));
        assert!(result.warnings[0].message.contains("accepting_submissions"));
    }

    #[test]
    fn unknown_phase_suggests_close_match() {
        let config = DatasetConfig {
            subjects: vec![subject("s1", WorkflowType::Project2, "THESIS_FAILD")],
            ..DatasetConfig::default()
        };
        let result = validate(&config);
        assert!(result.is_valid());
        assert!(result.warnings[0].message.contains("did you mean 'THESIS_FAILED'"));
    }

    #[test]
    fn phase_from_other_workflow_warns() {
        let config = DatasetConfig {
            subjects: vec![subject("s1", WorkflowType::Project1, "THESIS_SUBMISSION")],
            ..DatasetConfig::default()
        };
        let result = validate(&config);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("project2"));
    }

    #[test]
    fn shared_in_progress_is_fine_for_internship() {
        let config = DatasetConfig {
            subjects: vec![subject("s1", WorkflowType::Internship, "IN_PROGRESS")],
            ..DatasetConfig::default()
        };
        assert!(validate(&config).warnings.is_empty());
    }

    #[test]
    fn duplicate_subjects_are_errors() {
        let config = DatasetConfig {
            subjects: vec![
                subject("s1", WorkflowType::Project1, "DRAFT"),
                subject("s1", WorkflowType::Project1, "DRAFT"),
            ],
            ..DatasetConfig::default()
        };
        assert_eq!(validate(&config).errors.len(), 1);
    }

    #[test]
    fn limits_enforced() {
        let config = DatasetConfig {
            deadlines: vec![draft("a"), draft("b")],
            ..DatasetConfig::default()
        };
        let limits = ConfigLimits {
            max_deadlines: 1,
            ..ConfigLimits::default()
        };
        let result = Validator::new().validate(&config, &limits);
        assert_eq!(result.errors[0].path, "deadlines");
    }

    #[test]
    fn collects_all_errors() {
        let mut bad_grace = draft("a");
        bad_grace.grace_period_minutes = Some(-5);
        let mut bad_semester = draft("b");
        bad_semester.semester = 9;
        let config = DatasetConfig {
            deadlines: vec![bad_grace, bad_semester, draft("")],
            subjects: vec![subject("", WorkflowType::Project1, "DRAFT")],
            ..DatasetConfig::default()
        };
        assert_eq!(validate(&config).errors.len(), 4);
    }
}
