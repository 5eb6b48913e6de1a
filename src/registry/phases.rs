//! Closed workflow phase enumerations.
//!
//! Each workflow type owns its own phase set. The project1 and project2 sets
//! are disjoint; the internship set shares the name `IN_PROGRESS` with
//! project2, which is why lookups that know the subject's workflow type go
//! through [`WorkflowPhase::parse_in`].

use serde::{Deserialize, Serialize};

use crate::types::WorkflowType;

/// Declares a phase enum together with its wire names.
///
/// Generates `ALL`, `as_str`, `from_name`, and `Display` so the name table
/// and the enum cannot drift apart.
macro_rules! phase_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            /// Every phase in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire name as stored in workflow state.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }

            /// Parses a wire name. Unknown names yield `None`.
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( $text => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

phase_enum! {
    /// Internship workflow phases.
    InternshipPhase {
        /// Student must submit the CS05 internship request form.
        PendingCs05Submission => "PENDING_CS05_SUBMISSION",
        /// CS05 submitted, waiting for staff approval.
        PendingCs05Approval => "PENDING_CS05_APPROVAL",
        /// Waiting for the host company's acceptance letter.
        PendingAcceptanceLetter => "PENDING_ACCEPTANCE_LETTER",
        /// Internship under way.
        InProgress => "IN_PROGRESS",
        /// Final internship report is due.
        PendingReportSubmission => "PENDING_REPORT_SUBMISSION",
        /// Supervisor evaluation outstanding.
        PendingEvaluation => "PENDING_EVALUATION",
        /// Internship finished.
        Completed => "COMPLETED",
    }
}

phase_enum! {
    /// Capstone phase 1 workflow phases.
    Project1Phase {
        Draft => "DRAFT",
        AdvisorAssigned => "ADVISOR_ASSIGNED",
        TopicSubmission => "TOPIC_SUBMISSION",
        TopicExamPending => "TOPIC_EXAM_PENDING",
        TopicExamScheduled => "TOPIC_EXAM_SCHEDULED",
        TopicFailed => "TOPIC_FAILED",
    }
}

phase_enum! {
    /// Capstone phase 2 (thesis) workflow phases.
    Project2Phase {
        InProgress => "IN_PROGRESS",
        ThesisSubmission => "THESIS_SUBMISSION",
        ThesisExamPending => "THESIS_EXAM_PENDING",
        ThesisExamScheduled => "THESIS_EXAM_SCHEDULED",
        ThesisExamPassed => "THESIS_EXAM_PASSED",
        ThesisFailed => "THESIS_FAILED",
    }
}

/// A phase tagged with the workflow it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowPhase {
    /// Internship phase.
    Internship(InternshipPhase),
    /// Capstone phase 1 phase.
    Project1(Project1Phase),
    /// Capstone phase 2 phase.
    Project2(Project2Phase),
}

impl WorkflowPhase {
    /// Context-free parse of a phase name.
    ///
    /// Project1 and project2 membership is checked first; the internship
    /// table is consulted last. A bare `IN_PROGRESS` therefore classifies
    /// as project2.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Project1Phase::from_name(name)
            .map(Self::Project1)
            .or_else(|| Project2Phase::from_name(name).map(Self::Project2))
            .or_else(|| InternshipPhase::from_name(name).map(Self::Internship))
    }

    /// Parses a phase name within a known workflow type.
    #[must_use]
    pub fn parse_in(workflow_type: WorkflowType, name: &str) -> Option<Self> {
        match workflow_type {
            WorkflowType::Internship => InternshipPhase::from_name(name).map(Self::Internship),
            WorkflowType::Project1 => Project1Phase::from_name(name).map(Self::Project1),
            WorkflowType::Project2 => Project2Phase::from_name(name).map(Self::Project2),
        }
    }

    /// Workflow type this phase belongs to.
    #[must_use]
    pub const fn workflow_type(self) -> WorkflowType {
        match self {
            Self::Internship(_) => WorkflowType::Internship,
            Self::Project1(_) => WorkflowType::Project1,
            Self::Project2(_) => WorkflowType::Project2,
        }
    }

    /// Wire name of the phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internship(p) => p.as_str(),
            Self::Project1(p) => p.as_str(),
            Self::Project2(p) => p.as_str(),
        }
    }
}

impl std::fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.workflow_type(), self.as_str())
    }
}

/// Every known phase name across all workflow types, deduplicated.
#[must_use]
pub fn all_phase_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Project1Phase::ALL
        .iter()
        .map(|p| p.as_str())
        .chain(Project2Phase::ALL.iter().map(|p| p.as_str()))
        .chain(InternshipPhase::ALL.iter().map(|p| p.as_str()))
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_phase_sets_are_disjoint() {
        for p1 in Project1Phase::ALL {
            assert!(
                Project2Phase::from_name(p1.as_str()).is_none(),
                "{p1} appears in both project sets"
            );
        }
    }

    #[test]
    fn parse_prefers_project2_for_shared_name() {
        assert_eq!(
            WorkflowPhase::parse("IN_PROGRESS"),
            Some(WorkflowPhase::Project2(Project2Phase::InProgress))
        );
    }

    #[test]
    fn parse_in_respects_workflow_hint() {
        assert_eq!(
            WorkflowPhase::parse_in(WorkflowType::Internship, "IN_PROGRESS"),
            Some(WorkflowPhase::Internship(InternshipPhase::InProgress))
        );
        assert_eq!(
            WorkflowPhase::parse_in(WorkflowType::Project1, "THESIS_FAILED"),
            None
        );
    }

    #[test]
    fn internship_only_names_parse_without_hint() {
        let phase = WorkflowPhase::parse("PENDING_CS05_SUBMISSION").unwrap();
        assert_eq!(phase.workflow_type(), WorkflowType::Internship);
    }

    #[test]
    fn names_round_trip_through_from_name() {
        for p in Project2Phase::ALL {
            assert_eq!(Project2Phase::from_name(p.as_str()), Some(*p));
        }
    }

    #[test]
    fn phase_names_are_case_sensitive() {
        assert!(WorkflowPhase::parse("draft").is_none());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&Project1Phase::TopicExamPending).unwrap();
        assert_eq!(json, "\"TOPIC_EXAM_PENDING\"");
    }

    #[test]
    fn all_phase_names_dedupes_shared_name() {
        let names = all_phase_names();
        assert_eq!(names.iter().filter(|n| **n == "IN_PROGRESS").count(), 1);
        assert!(names.contains(&"PENDING_EVALUATION"));
    }

    #[test]
    fn display_includes_workflow() {
        let phase = WorkflowPhase::Project1(Project1Phase::Draft);
        assert_eq!(phase.to_string(), "project1:DRAFT");
    }
}
