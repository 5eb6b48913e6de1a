//! Workflow state tracker
//!
//! Applies the phase registry and the resolver across a subject's applicable
//! deadlines and maintains the derived `is_overdue` / `is_blocked` caches.
//!
//! The caches are eventually consistent: concurrent recomputes for one
//! subject race with last-write-wins, and a flag may be stale until the
//! next recompute on any access path. Writes happen only when a recomputed
//! value differs from the stored one, so repeated calls are idempotent.
//! This component never changes `current_phase`.

pub mod state;

pub use state::{BatchSummary, OverdueDeadline, OverdueSummary, WorkflowState};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::observability::events::{Event, EventEmitter};
use crate::observability::metrics;
use crate::registry::{WorkflowPhase, classify, templates};
use crate::resolver::{DeadlineRecord, DeadlineStatus, evaluate};
use crate::store::{DeadlineQuery, DeadlineStore, WorkflowStateStore, best_match};
use crate::types::DeadlineType;

/// Recomputes and caches per-subject overdue and blocked flags.
pub struct WorkflowStateTracker {
    deadlines: Arc<dyn DeadlineStore>,
    states: Arc<dyn WorkflowStateStore>,
    events: Option<Arc<EventEmitter>>,
}

impl std::fmt::Debug for WorkflowStateTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowStateTracker")
            .field("events", &self.events.is_some())
            .finish_non_exhaustive()
    }
}

impl WorkflowStateTracker {
    /// Creates a tracker over the given collaborators.
    #[must_use]
    pub fn new(deadlines: Arc<dyn DeadlineStore>, states: Arc<dyn WorkflowStateStore>) -> Self {
        Self {
            deadlines,
            states,
            events: None,
        }
    }

    /// Attaches an audit event emitter.
    #[must_use]
    pub fn with_events(mut self, events: Arc<EventEmitter>) -> Self {
        self.events = Some(events);
        self
    }

    /// Published records for the subject's workflow and enrollment, ordered
    /// by `deadline_at` ascending.
    ///
    /// Unknown subjects and unmapped phases yield an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if either store fails.
    pub async fn get_applicable_deadlines(
        &self,
        subject_id: &str,
    ) -> Result<Vec<DeadlineRecord>, StoreError> {
        let Some(state) = self.states.get_state(subject_id).await? else {
            debug!(subject_id, "unknown subject, no applicable deadlines");
            return Ok(Vec::new());
        };
        Ok(self
            .applicable(&state)
            .await?
            .map(|(_, records)| records)
            .unwrap_or_default())
    }

    /// Recomputes `is_overdue` and `is_blocked` for one subject at `now`.
    ///
    /// A subject is overdue when any applicable `SUBMISSION` record is past
    /// its effective deadline, locked or not. Other deadline types never
    /// make a subject overdue. A subject is blocked when the current phase's
    /// template blocks on lock and its resolved record evaluates to
    /// `Locked` or `WindowClosed`.
    ///
    /// Each flag is written only if it differs from the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on read or write failure.
    pub async fn recompute_overdue(
        &self,
        subject_id: &str,
        now: DateTime<Utc>,
    ) -> Result<OverdueSummary, StoreError> {
        let Some(state) = self.states.get_state(subject_id).await? else {
            debug!(subject_id, "unknown subject, nothing to recompute");
            return Ok(OverdueSummary::empty(subject_id));
        };

        let (phase, records) = match self.applicable(&state).await? {
            Some((phase, records)) => (Some(phase), records),
            None => (None, Vec::new()),
        };

        let mut overdue_deadlines = Vec::new();
        for record in &records {
            let status = evaluate(Some(record), now);
            metrics::record_evaluation(status.kind());
            if record.deadline_type != DeadlineType::Submission || !status.is_past_deadline() {
                continue;
            }
            overdue_deadlines.push(OverdueDeadline {
                deadline_id: record.id.clone(),
                name: record.name.clone(),
                effective_deadline: record.effective_deadline(),
                minutes_late: status.minutes_late().unwrap_or(0),
                locked: matches!(status, DeadlineStatus::Locked { .. }),
            });
        }

        let next_deadline = records.iter().find(|r| r.deadline_at > now).cloned();
        let is_overdue = !overdue_deadlines.is_empty();
        let is_blocked = phase.is_some_and(|p| blocks(p, &records, now));

        let overdue_written = if is_overdue == state.is_overdue {
            false
        } else {
            self.states.update_is_overdue(subject_id, is_overdue).await?;
            metrics::record_overdue_write();
            info!(
                subject_id,
                is_overdue,
                overdue_count = overdue_deadlines.len(),
                "overdue flag changed"
            );
            self.emit(Event::OverdueFlagChanged {
                timestamp: now,
                subject_id: subject_id.to_string(),
                is_overdue,
            });
            true
        };

        let blocked_written = if is_blocked == state.is_blocked {
            false
        } else {
            self.states.update_is_blocked(subject_id, is_blocked).await?;
            metrics::record_blocked_write();
            info!(subject_id, is_blocked, phase = %state.current_phase, "blocked flag changed");
            self.emit(Event::BlockedFlagChanged {
                timestamp: now,
                subject_id: subject_id.to_string(),
                is_blocked,
            });
            true
        };

        Ok(OverdueSummary {
            subject_id: subject_id.to_string(),
            is_overdue,
            is_blocked,
            overdue_deadlines,
            next_deadline,
            overdue_written,
            blocked_written,
        })
    }

    /// Recomputes every known subject.
    ///
    /// Per-subject failures are logged and counted; only a failure to list
    /// subjects aborts the batch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the subject list cannot be read.
    pub async fn recompute_all(&self, now: DateTime<Utc>) -> Result<BatchSummary, StoreError> {
        let subjects = self.states.list_subjects().await?;
        let mut batch = BatchSummary::default();

        for subject_id in &subjects {
            match self.recompute_overdue(subject_id, now).await {
                Ok(summary) => {
                    batch.processed += 1;
                    batch.overdue += usize::from(summary.is_overdue);
                    batch.blocked += usize::from(summary.is_blocked);
                    batch.writes += usize::from(summary.overdue_written)
                        + usize::from(summary.blocked_written);
                }
                Err(e) => {
                    warn!(subject_id = %subject_id, error = %e, "recompute failed");
                    batch.failures += 1;
                }
            }
        }

        info!(
            processed = batch.processed,
            overdue = batch.overdue,
            blocked = batch.blocked,
            writes = batch.writes,
            failures = batch.failures,
            "batch recompute complete"
        );
        self.emit(Event::RecomputeCompleted {
            timestamp: now,
            processed: batch.processed,
            failures: batch.failures,
        });

        Ok(batch)
    }

    /// Classified phase plus its sorted applicable records, or `None` when
    /// the phase has no workflow mapping.
    async fn applicable(
        &self,
        state: &WorkflowState,
    ) -> Result<Option<(WorkflowPhase, Vec<DeadlineRecord>)>, StoreError> {
        let Some(phase) = classify(Some(state.workflow_type), &state.current_phase) else {
            debug!(
                subject_id = %state.subject_id,
                phase = %state.current_phase,
                "phase has no workflow mapping"
            );
            return Ok(None);
        };

        let query = DeadlineQuery::published(
            phase.workflow_type(),
            state.academic_year,
            state.semester,
        );
        let mut records = self.deadlines.find_matching(&query).await?;
        records.sort_by(|a, b| {
            a.deadline_at
                .cmp(&b.deadline_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(Some((phase, records)))
    }

    fn emit(&self, event: Event) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}

/// Whether the phase's blocking template resolves to a locked record.
fn blocks(phase: WorkflowPhase, records: &[DeadlineRecord], now: DateTime<Utc>) -> bool {
    let Some(template) = templates::template_for(phase) else {
        return false;
    };
    if !template.block_if_locked {
        return false;
    }
    let candidates = records
        .iter()
        .filter(|r| r.deadline_type == template.deadline_type);
    best_match(candidates, template.document_subtype).is_some_and(|(record, _)| {
        matches!(
            evaluate(Some(record), now),
            DeadlineStatus::Locked { .. } | DeadlineStatus::WindowClosed { .. }
        )
    })
}
