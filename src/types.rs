//! Shared vocabulary types.
//!
//! Workflow and deadline categories used by every component. Both are
//! closed enums so that every `match` over them stays exhaustive.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The academic workflow a subject is enrolled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowType {
    /// Internship placement workflow.
    Internship,
    /// Capstone phase 1 (topic proposal and topic exam).
    Project1,
    /// Capstone phase 2 (thesis and thesis exam).
    Project2,
}

impl WorkflowType {
    /// Every workflow type, in reporting order.
    pub const ALL: [Self; 3] = [Self::Internship, Self::Project1, Self::Project2];

    /// Wire name used in deadline records (`related_to`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Internship => "internship",
            Self::Project1 => "project1",
            Self::Project2 => "project2",
        }
    }
}

impl std::fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a deadline.
///
/// Gated actions are named by the deadline type they are checked against,
/// so this doubles as the gate's action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeadlineType {
    /// A document must be submitted.
    Submission,
    /// Informational date; never accepts submissions.
    Announcement,
    /// A scheduled event such as an exam.
    Milestone,
}

impl DeadlineType {
    /// Wire name used in deadline records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submission => "SUBMISSION",
            Self::Announcement => "ANNOUNCEMENT",
            Self::Milestone => "MILESTONE",
        }
    }
}

impl std::fmt::Display for DeadlineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
