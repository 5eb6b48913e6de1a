//! Persistence collaborators
//!
//! The core reads deadline records and workflow state through these traits
//! and writes back only the derived `is_overdue` / `is_blocked` caches.
//! Record editing belongs to an external admin surface and has no method
//! here. Timeouts, retries, and transactions are the implementor's concern.

pub mod lookup;
pub mod memory;

pub use lookup::{MatchKind, best_match, locate};
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::resolver::DeadlineRecord;
use crate::tracker::WorkflowState;
use crate::types::{DeadlineType, WorkflowType};

/// Filter for [`DeadlineStore::find_matching`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineQuery {
    /// Workflow the records must relate to.
    pub related_to: WorkflowType,
    /// Academic year of the subject's enrollment.
    pub academic_year: u32,
    /// Semester of the subject's enrollment.
    pub semester: u8,
    /// Restrict to one deadline type; `None` returns every type.
    pub deadline_type: Option<DeadlineType>,
    /// Restrict to published records.
    pub published_only: bool,
}

impl DeadlineQuery {
    /// Published records for a workflow and enrollment, any type.
    #[must_use]
    pub const fn published(related_to: WorkflowType, academic_year: u32, semester: u8) -> Self {
        Self {
            related_to,
            academic_year,
            semester,
            deadline_type: None,
            published_only: true,
        }
    }

    /// Narrows the query to one deadline type.
    #[must_use]
    pub const fn with_type(mut self, deadline_type: DeadlineType) -> Self {
        self.deadline_type = Some(deadline_type);
        self
    }

    /// Whether `record` satisfies the filter.
    #[must_use]
    pub fn matches(&self, record: &DeadlineRecord) -> bool {
        record.related_to == self.related_to
            && record.academic_year == self.academic_year
            && record.semester == self.semester
            && self.deadline_type.is_none_or(|t| t == record.deadline_type)
            && (!self.published_only || record.is_published)
    }
}

/// Read access to deadline records.
#[async_trait]
pub trait DeadlineStore: Send + Sync {
    /// Records matching `query`. Ordering is unspecified.
    async fn find_matching(&self, query: &DeadlineQuery)
    -> Result<Vec<DeadlineRecord>, StoreError>;

    /// A single record by id.
    async fn get(&self, id: &str) -> Result<Option<DeadlineRecord>, StoreError>;
}

/// Workflow state access: read everything, write only the derived caches.
#[async_trait]
pub trait WorkflowStateStore: Send + Sync {
    /// State of one subject, or `None` if unknown.
    async fn get_state(&self, subject_id: &str) -> Result<Option<WorkflowState>, StoreError>;

    /// Ids of every tracked subject.
    async fn list_subjects(&self) -> Result<Vec<String>, StoreError>;

    /// Persists the derived overdue flag.
    async fn update_is_overdue(&self, subject_id: &str, is_overdue: bool)
    -> Result<(), StoreError>;

    /// Persists the derived blocked flag.
    async fn update_is_blocked(&self, subject_id: &str, is_blocked: bool)
    -> Result<(), StoreError>;
}
