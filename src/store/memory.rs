//! In-memory store backed by `DashMap`.
//!
//! Implements both collaborator traits. Used by the CLI (loaded from a
//! dataset file) and by tests, which can also count writes and simulate an
//! outage.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::StoreError;
use crate::resolver::DeadlineRecord;
use crate::tracker::WorkflowState;

use super::{DeadlineQuery, DeadlineStore, WorkflowStateStore};

/// Concurrent in-memory deadline and workflow-state store.
#[derive(Default)]
pub struct MemoryStore {
    deadlines: DashMap<String, DeadlineRecord>,
    states: DashMap<String, WorkflowState>,
    overdue_writes: AtomicU64,
    blocked_writes: AtomicU64,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with records and states.
    #[must_use]
    pub fn with_data(
        deadlines: impl IntoIterator<Item = DeadlineRecord>,
        states: impl IntoIterator<Item = WorkflowState>,
    ) -> Self {
        let store = Self::new();
        for record in deadlines {
            store.insert_deadline(record);
        }
        for state in states {
            store.insert_state(state);
        }
        store
    }

    /// Inserts or replaces a deadline record.
    pub fn insert_deadline(&self, record: DeadlineRecord) {
        self.deadlines.insert(record.id.clone(), record);
    }

    /// Removes a deadline record.
    pub fn remove_deadline(&self, id: &str) -> Option<DeadlineRecord> {
        self.deadlines.remove(id).map(|(_, r)| r)
    }

    /// Inserts or replaces a subject's workflow state.
    pub fn insert_state(&self, state: WorkflowState) {
        self.states.insert(state.subject_id.clone(), state);
    }

    /// Sets a subject's phase, as an external approval workflow would.
    ///
    /// Returns `false` if the subject is unknown.
    pub fn set_phase(&self, subject_id: &str, phase: impl Into<String>) -> bool {
        self.states.get_mut(subject_id).is_some_and(|mut state| {
            state.current_phase = phase.into();
            true
        })
    }

    /// Snapshot of a subject's state without going through the trait.
    #[must_use]
    pub fn state(&self, subject_id: &str) -> Option<WorkflowState> {
        self.states.get(subject_id).map(|s| s.clone())
    }

    /// Snapshot of a deadline record without going through the trait.
    #[must_use]
    pub fn record(&self, id: &str) -> Option<DeadlineRecord> {
        self.deadlines.get(id).map(|r| r.clone())
    }

    /// Number of `update_is_overdue` calls that reached the store.
    #[must_use]
    pub fn overdue_writes(&self) -> u64 {
        self.overdue_writes.load(Ordering::SeqCst)
    }

    /// Number of `update_is_blocked` calls that reached the store.
    #[must_use]
    pub fn blocked_writes(&self) -> u64 {
        self.blocked_writes.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("deadlines", &self.deadlines.len())
            .field("states", &self.states.len())
            .field("overdue_writes", &self.overdue_writes())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DeadlineStore for MemoryStore {
    async fn find_matching(
        &self,
        query: &DeadlineQuery,
    ) -> Result<Vec<DeadlineRecord>, StoreError> {
        self.check_available()?;
        let mut found: Vec<DeadlineRecord> = self
            .deadlines
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        // DashMap iteration order is arbitrary; keep results stable.
        found.sort_by(|a, b| a.deadline_at.cmp(&b.deadline_at).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn get(&self, id: &str) -> Result<Option<DeadlineRecord>, StoreError> {
        self.check_available()?;
        Ok(self.deadlines.get(id).map(|r| r.clone()))
    }
}

#[async_trait]
impl WorkflowStateStore for MemoryStore {
    async fn get_state(&self, subject_id: &str) -> Result<Option<WorkflowState>, StoreError> {
        self.check_available()?;
        Ok(self.state(subject_id))
    }

    async fn list_subjects(&self) -> Result<Vec<String>, StoreError> {
        self.check_available()?;
        let mut ids: Vec<String> = self.states.iter().map(|s| s.key().clone()).collect();
        ids.sort();
        Ok(ids)
    }

    async fn update_is_overdue(
        &self,
        subject_id: &str,
        is_overdue: bool,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut state = self
            .states
            .get_mut(subject_id)
            .ok_or_else(|| StoreError::Write {
                subject_id: subject_id.to_string(),
                message: "no such subject".to_string(),
            })?;
        state.is_overdue = is_overdue;
        self.overdue_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_is_blocked(
        &self,
        subject_id: &str,
        is_blocked: bool,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut state = self
            .states
            .get_mut(subject_id)
            .ok_or_else(|| StoreError::Write {
                subject_id: subject_id.to_string(),
                message: "no such subject".to_string(),
            })?;
        state.is_blocked = is_blocked;
        self.blocked_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
