//! Static deadline templates.
//!
//! Templates describe which kind of deadline a phase expects. They are
//! plain `static` data, so they exist for the life of the process and are
//! never mutated. Phase-to-template mapping is an exhaustive `match` per
//! phase enum: adding a phase does not compile until it is mapped.

use serde::Serialize;

use crate::types::{DeadlineType, WorkflowType};

use super::phases::{InternshipPhase, Project1Phase, Project2Phase, WorkflowPhase};

/// Static descriptor linking a workflow phase to the deadline it expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlineTemplate {
    /// Stable identifier used by reporting.
    pub template_id: &'static str,
    /// Human-readable deadline name.
    pub deadline_name: &'static str,
    /// Workflow the deadline belongs to.
    pub related_to: WorkflowType,
    /// Document subtype matched against records, if any.
    pub document_subtype: Option<&'static str>,
    /// Category of the deadline.
    pub deadline_type: DeadlineType,
    /// Whether every student in the workflow must meet it.
    pub is_required: bool,
    /// Whether a locked deadline blocks the student's workflow.
    pub block_if_locked: bool,
    /// Days of advance notice before the deadline, if announced.
    pub advance_notice_days: Option<u32>,
}

// ============================================================================
// Internship
// ============================================================================

static INTERNSHIP_CS05: DeadlineTemplate = DeadlineTemplate {
    template_id: "internship_cs05_submission",
    deadline_name: "CS05 internship request",
    related_to: WorkflowType::Internship,
    document_subtype: Some("CS05"),
    deadline_type: DeadlineType::Submission,
    is_required: true,
    block_if_locked: true,
    advance_notice_days: Some(14),
};

static INTERNSHIP_ACCEPTANCE_LETTER: DeadlineTemplate = DeadlineTemplate {
    template_id: "internship_acceptance_letter",
    deadline_name: "Company acceptance letter",
    related_to: WorkflowType::Internship,
    document_subtype: Some("ACCEPTANCE_LETTER"),
    deadline_type: DeadlineType::Submission,
    is_required: true,
    block_if_locked: true,
    advance_notice_days: Some(7),
};

static INTERNSHIP_TIMESHEET: DeadlineTemplate = DeadlineTemplate {
    template_id: "internship_timesheet",
    deadline_name: "Internship timesheet",
    related_to: WorkflowType::Internship,
    document_subtype: Some("TIMESHEET"),
    deadline_type: DeadlineType::Submission,
    is_required: false,
    block_if_locked: false,
    advance_notice_days: Some(3),
};

static INTERNSHIP_REPORT: DeadlineTemplate = DeadlineTemplate {
    template_id: "internship_final_report",
    deadline_name: "Internship final report",
    related_to: WorkflowType::Internship,
    document_subtype: Some("INTERNSHIP_REPORT"),
    deadline_type: DeadlineType::Submission,
    is_required: true,
    block_if_locked: true,
    advance_notice_days: Some(14),
};

static INTERNSHIP_EVALUATION: DeadlineTemplate = DeadlineTemplate {
    template_id: "internship_supervisor_evaluation",
    deadline_name: "Supervisor evaluation",
    related_to: WorkflowType::Internship,
    document_subtype: Some("SUPERVISOR_EVALUATION"),
    deadline_type: DeadlineType::Milestone,
    is_required: true,
    block_if_locked: false,
    advance_notice_days: Some(7),
};

static INTERNSHIP_ORIENTATION: DeadlineTemplate = DeadlineTemplate {
    template_id: "internship_orientation",
    deadline_name: "Internship orientation",
    related_to: WorkflowType::Internship,
    document_subtype: None,
    deadline_type: DeadlineType::Announcement,
    is_required: false,
    block_if_locked: false,
    advance_notice_days: Some(7),
};

static INTERNSHIP_TEMPLATES: [&DeadlineTemplate; 6] = [
    &INTERNSHIP_ORIENTATION,
    &INTERNSHIP_CS05,
    &INTERNSHIP_ACCEPTANCE_LETTER,
    &INTERNSHIP_TIMESHEET,
    &INTERNSHIP_REPORT,
    &INTERNSHIP_EVALUATION,
];

fn internship_template(phase: InternshipPhase) -> Option<&'static DeadlineTemplate> {
    match phase {
        InternshipPhase::PendingCs05Submission => Some(&INTERNSHIP_CS05),
        InternshipPhase::PendingAcceptanceLetter => Some(&INTERNSHIP_ACCEPTANCE_LETTER),
        InternshipPhase::InProgress => Some(&INTERNSHIP_TIMESHEET),
        InternshipPhase::PendingReportSubmission => Some(&INTERNSHIP_REPORT),
        InternshipPhase::PendingEvaluation => Some(&INTERNSHIP_EVALUATION),
        InternshipPhase::PendingCs05Approval | InternshipPhase::Completed => None,
    }
}

// ============================================================================
// Project 1
// ============================================================================

static PROJECT1_ADVISOR_REQUEST: DeadlineTemplate = DeadlineTemplate {
    template_id: "project1_advisor_request",
    deadline_name: "Advisor request",
    related_to: WorkflowType::Project1,
    document_subtype: Some("ADVISOR_REQUEST"),
    deadline_type: DeadlineType::Submission,
    is_required: true,
    block_if_locked: false,
    advance_notice_days: Some(7),
};

static PROJECT1_TOPIC_PROPOSAL: DeadlineTemplate = DeadlineTemplate {
    template_id: "project1_topic_proposal",
    deadline_name: "Topic proposal submission",
    related_to: WorkflowType::Project1,
    document_subtype: Some("TOPIC_PROPOSAL"),
    deadline_type: DeadlineType::Submission,
    is_required: true,
    block_if_locked: true,
    advance_notice_days: Some(14),
};

static PROJECT1_TOPIC_EXAM_REQUEST: DeadlineTemplate = DeadlineTemplate {
    template_id: "project1_topic_exam_request",
    deadline_name: "Topic exam request",
    related_to: WorkflowType::Project1,
    document_subtype: Some("TOPIC_EXAM_REQUEST"),
    deadline_type: DeadlineType::Submission,
    is_required: true,
    block_if_locked: true,
    advance_notice_days: Some(7),
};

static PROJECT1_TOPIC_EXAM: DeadlineTemplate = DeadlineTemplate {
    template_id: "project1_topic_exam",
    deadline_name: "Topic exam",
    related_to: WorkflowType::Project1,
    document_subtype: None,
    deadline_type: DeadlineType::Milestone,
    is_required: true,
    block_if_locked: false,
    advance_notice_days: Some(3),
};

static PROJECT1_TOPIC_RESUBMISSION: DeadlineTemplate = DeadlineTemplate {
    template_id: "project1_topic_resubmission",
    deadline_name: "Topic proposal resubmission",
    related_to: WorkflowType::Project1,
    document_subtype: Some("TOPIC_PROPOSAL_REVISION"),
    deadline_type: DeadlineType::Submission,
    is_required: false,
    block_if_locked: true,
    advance_notice_days: Some(7),
};

static PROJECT1_KICKOFF: DeadlineTemplate = DeadlineTemplate {
    template_id: "project1_kickoff_announcement",
    deadline_name: "Capstone kickoff",
    related_to: WorkflowType::Project1,
    document_subtype: None,
    deadline_type: DeadlineType::Announcement,
    is_required: false,
    block_if_locked: false,
    advance_notice_days: Some(7),
};

static PROJECT1_TEMPLATES: [&DeadlineTemplate; 6] = [
    &PROJECT1_KICKOFF,
    &PROJECT1_ADVISOR_REQUEST,
    &PROJECT1_TOPIC_PROPOSAL,
    &PROJECT1_TOPIC_EXAM_REQUEST,
    &PROJECT1_TOPIC_EXAM,
    &PROJECT1_TOPIC_RESUBMISSION,
];

fn project1_template(phase: Project1Phase) -> Option<&'static DeadlineTemplate> {
    match phase {
        Project1Phase::Draft => Some(&PROJECT1_ADVISOR_REQUEST),
        Project1Phase::AdvisorAssigned | Project1Phase::TopicSubmission => {
            Some(&PROJECT1_TOPIC_PROPOSAL)
        }
        Project1Phase::TopicExamPending => Some(&PROJECT1_TOPIC_EXAM_REQUEST),
        Project1Phase::TopicExamScheduled => Some(&PROJECT1_TOPIC_EXAM),
        Project1Phase::TopicFailed => Some(&PROJECT1_TOPIC_RESUBMISSION),
    }
}

// ============================================================================
// Project 2
// ============================================================================

static PROJECT2_PROGRESS_REPORT: DeadlineTemplate = DeadlineTemplate {
    template_id: "project2_progress_report",
    deadline_name: "Thesis progress report",
    related_to: WorkflowType::Project2,
    document_subtype: Some("PROGRESS_REPORT"),
    deadline_type: DeadlineType::Submission,
    is_required: false,
    block_if_locked: false,
    advance_notice_days: Some(7),
};

static PROJECT2_THESIS_DRAFT: DeadlineTemplate = DeadlineTemplate {
    template_id: "project2_thesis_submission",
    deadline_name: "Thesis draft submission",
    related_to: WorkflowType::Project2,
    document_subtype: Some("THESIS_DRAFT"),
    deadline_type: DeadlineType::Submission,
    is_required: true,
    block_if_locked: true,
    advance_notice_days: Some(14),
};

static PROJECT2_THESIS_EXAM_REQUEST: DeadlineTemplate = DeadlineTemplate {
    template_id: "project2_thesis_exam_request",
    deadline_name: "Thesis exam request",
    related_to: WorkflowType::Project2,
    document_subtype: Some("THESIS_EXAM_REQUEST"),
    deadline_type: DeadlineType::Submission,
    is_required: true,
    block_if_locked: true,
    advance_notice_days: Some(7),
};

static PROJECT2_THESIS_EXAM: DeadlineTemplate = DeadlineTemplate {
    template_id: "project2_thesis_exam",
    deadline_name: "Thesis exam",
    related_to: WorkflowType::Project2,
    document_subtype: None,
    deadline_type: DeadlineType::Milestone,
    is_required: true,
    block_if_locked: false,
    advance_notice_days: Some(3),
};

static PROJECT2_FINAL_THESIS: DeadlineTemplate = DeadlineTemplate {
    template_id: "project2_final_thesis",
    deadline_name: "Final thesis document",
    related_to: WorkflowType::Project2,
    document_subtype: Some("FINAL_THESIS"),
    deadline_type: DeadlineType::Submission,
    is_required: true,
    block_if_locked: true,
    advance_notice_days: Some(14),
};

static PROJECT2_THESIS_RESUBMISSION: DeadlineTemplate = DeadlineTemplate {
    template_id: "project2_thesis_resubmission",
    deadline_name: "Thesis resubmission",
    related_to: WorkflowType::Project2,
    document_subtype: Some("THESIS_REVISION"),
    deadline_type: DeadlineType::Submission,
    is_required: false,
    block_if_locked: true,
    advance_notice_days: Some(7),
};

static PROJECT2_EXAM_SCHEDULE: DeadlineTemplate = DeadlineTemplate {
    template_id: "project2_exam_schedule_announcement",
    deadline_name: "Thesis exam schedule published",
    related_to: WorkflowType::Project2,
    document_subtype: None,
    deadline_type: DeadlineType::Announcement,
    is_required: false,
    block_if_locked: false,
    advance_notice_days: None,
};

static PROJECT2_TEMPLATES: [&DeadlineTemplate; 7] = [
    &PROJECT2_PROGRESS_REPORT,
    &PROJECT2_THESIS_DRAFT,
    &PROJECT2_THESIS_EXAM_REQUEST,
    &PROJECT2_EXAM_SCHEDULE,
    &PROJECT2_THESIS_EXAM,
    &PROJECT2_FINAL_THESIS,
    &PROJECT2_THESIS_RESUBMISSION,
];

fn project2_template(phase: Project2Phase) -> Option<&'static DeadlineTemplate> {
    match phase {
        Project2Phase::InProgress => Some(&PROJECT2_PROGRESS_REPORT),
        Project2Phase::ThesisSubmission => Some(&PROJECT2_THESIS_DRAFT),
        Project2Phase::ThesisExamPending => Some(&PROJECT2_THESIS_EXAM_REQUEST),
        Project2Phase::ThesisExamScheduled => Some(&PROJECT2_THESIS_EXAM),
        Project2Phase::ThesisExamPassed => Some(&PROJECT2_FINAL_THESIS),
        Project2Phase::ThesisFailed => Some(&PROJECT2_THESIS_RESUBMISSION),
    }
}

// ============================================================================
// Lookup
// ============================================================================

/// Template expected while a subject sits in `phase`, if any.
#[must_use]
pub fn template_for(phase: WorkflowPhase) -> Option<&'static DeadlineTemplate> {
    match phase {
        WorkflowPhase::Internship(p) => internship_template(p),
        WorkflowPhase::Project1(p) => project1_template(p),
        WorkflowPhase::Project2(p) => project2_template(p),
    }
}

/// Every template of a workflow type, in table order.
#[must_use]
pub fn templates(workflow_type: WorkflowType) -> &'static [&'static DeadlineTemplate] {
    match workflow_type {
        WorkflowType::Internship => &INTERNSHIP_TEMPLATES,
        WorkflowType::Project1 => &PROJECT1_TEMPLATES,
        WorkflowType::Project2 => &PROJECT2_TEMPLATES,
    }
}
