//! Enforcement gate
//!
//! Request-facing façade. For a subject and an action it resolves the
//! current phase, the phase's deadline template and the best matching
//! record, evaluates it, and maps the status to a [`Decision`].
//!
//! Failure policy is a property of the call site, chosen by [`GateMode`]:
//! enforcing checks fail closed, advisory checks fail open.

pub mod decision;

pub use decision::{Decision, DenialCode, DiagnosticReason, Diagnostics, GateMode, LockReason};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::observability::events::{Event, EventEmitter};
use crate::observability::metrics;
use crate::registry::{WorkflowPhase, classify, templates};
use crate::resolver::{DeadlineRecord, DeadlineStatus, evaluate};
use crate::store::{DeadlineQuery, DeadlineStore, MatchKind, WorkflowStateStore, locate};
use crate::types::DeadlineType;

/// What the lookup chain found before any policy is applied.
enum Resolution {
    NoMapping {
        phase: Option<String>,
    },
    NoTemplate {
        phase: WorkflowPhase,
    },
    Evaluated {
        phase: WorkflowPhase,
        record: Option<(DeadlineRecord, MatchKind)>,
        status: DeadlineStatus,
    },
}

/// Allow/deny façade over the registry, the resolver and the stores.
pub struct EnforcementGate {
    deadlines: Arc<dyn DeadlineStore>,
    states: Arc<dyn WorkflowStateStore>,
    events: Option<Arc<EventEmitter>>,
}

impl std::fmt::Debug for EnforcementGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnforcementGate")
            .field("events", &self.events.is_some())
            .finish_non_exhaustive()
    }
}

impl EnforcementGate {
    /// Creates a gate over the given stores, without audit events.
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

    /// Decides whether `subject_id` may perform `action` at `now`.
    ///
    /// Never returns an error: infrastructure failures become a deny
    /// (enforcing) or a bare allow (advisory), and the error itself is only
    /// logged.
    pub async fn check_before_action(
        &self,
        subject_id: &str,
        action: DeadlineType,
        mode: GateMode,
        now: DateTime<Utc>,
    ) -> Decision {
        let decision = match self.resolve(subject_id, action, now).await {
            Ok(resolution) => decide(resolution, mode),
            Err(e) => self.unavailable(subject_id, mode, now, &e),
        };

        metrics::record_decision(mode.as_str(), decision.allow);
        if !decision.allow {
            warn!(
                subject_id,
                mode = mode.as_str(),
                action = action.as_str(),
                reason = decision.reason().map(DiagnosticReason::as_str),
                "action denied"
            );
        }
        self.emit(Event::DecisionRecorded {
            timestamp: now,
            subject_id: subject_id.to_string(),
            mode: mode.as_str().to_string(),
            allow: decision.allow,
            status: decision.status.as_ref().map(|s| s.kind().as_str().to_string()),
            deadline_id: decision
                .diagnostics
                .as_ref()
                .and_then(|d| d.deadline_id.clone()),
        });

        decision
    }

    async fn resolve(
        &self,
        subject_id: &str,
        action: DeadlineType,
        now: DateTime<Utc>,
    ) -> Result<Resolution, StoreError> {
        let Some(state) = self.states.get_state(subject_id).await? else {
            debug!(subject_id, "unknown subject, enforcement disabled");
            return Ok(Resolution::NoMapping { phase: None });
        };

        let Some(phase) = classify(Some(state.workflow_type), &state.current_phase) else {
            debug!(subject_id, phase = %state.current_phase, "phase has no workflow mapping");
            return Ok(Resolution::NoMapping {
                phase: Some(state.current_phase),
            });
        };

        let Some(template) = templates::template_for(phase) else {
            debug!(subject_id, %phase, "phase has no deadline template");
            return Ok(Resolution::NoTemplate { phase });
        };

        let query = DeadlineQuery::published(
            phase.workflow_type(),
            state.academic_year,
            state.semester,
        );
        let record = locate(
            self.deadlines.as_ref(),
            query,
            action,
            template.document_subtype,
        )
        .await?;

        debug!(
            subject_id,
            %phase,
            template = template.template_id,
            deadline_id = record.as_ref().map(|(r, _)| r.id.as_str()),
            match_kind = ?record.as_ref().map(|(_, k)| *k),
            "deadline record resolved"
        );

        let status = evaluate(record.as_ref().map(|(r, _)| r), now);
        metrics::record_evaluation(status.kind());

        Ok(Resolution::Evaluated {
            phase,
            record,
            status,
        })
    }

    fn unavailable(
        &self,
        subject_id: &str,
        mode: GateMode,
        now: DateTime<Utc>,
        error: &StoreError,
    ) -> Decision {
        let failed_closed = mode == GateMode::Enforcing;
        warn!(
            subject_id,
            mode = mode.as_str(),
            error = %error,
            failed_closed,
            "deadline enforcement unavailable"
        );
        metrics::record_store_failure(mode.as_str());
        self.emit(Event::EnforcementUnavailable {
            timestamp: now,
            subject_id: subject_id.to_string(),
            mode: mode.as_str().to_string(),
            failed_closed,
        });

        match mode {
            GateMode::Enforcing => Decision {
                allow: false,
                status: None,
                diagnostics: Some(Diagnostics::new(DiagnosticReason::Unavailable)),
            },
            GateMode::Advisory => Decision::allow(),
        }
    }

    fn emit(&self, event: Event) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}

/// Maps a resolution to a decision under `mode`.
fn decide(resolution: Resolution, mode: GateMode) -> Decision {
    let (phase, record, status) = match resolution {
        Resolution::NoMapping { phase } => {
            let mut diagnostics = Diagnostics::new(DiagnosticReason::NoMapping);
            diagnostics.phase = phase;
            return Decision {
                allow: true,
                status: None,
                diagnostics: Some(diagnostics),
            };
        }
        Resolution::NoTemplate { phase } => {
            let mut diagnostics = Diagnostics::new(DiagnosticReason::NoTemplate);
            diagnostics.workflow_type = Some(phase.workflow_type());
            diagnostics.phase = Some(phase.as_str().to_string());
            return Decision {
                allow: true,
                status: None,
                diagnostics: Some(diagnostics),
            };
        }
        Resolution::Evaluated {
            phase,
            record,
            status,
        } => (phase, record, status),
    };

    let diagnostics = record
        .as_ref()
        .and_then(|(record, kind)| diagnose(&status, record, *kind, phase));
    let allow = match mode {
        GateMode::Enforcing => status.permits_action(),
        GateMode::Advisory => true,
    };

    Decision {
        allow,
        status: Some(status),
        diagnostics,
    }
}

/// Diagnostics for a status, or `None` for on-time and no-deadline.
fn diagnose(
    status: &DeadlineStatus,
    record: &DeadlineRecord,
    match_kind: MatchKind,
    phase: WorkflowPhase,
) -> Option<Diagnostics> {
    let mut d = match *status {
        DeadlineStatus::OnTime { .. } | DeadlineStatus::NoDeadlineDefined => return None,
        DeadlineStatus::WindowNotOpen { opens_at } => {
            let mut d = Diagnostics::new(DiagnosticReason::WindowNotOpen);
            d.code = Some(DenialCode::WindowNotOpen);
            d.opens_at = Some(opens_at);
            d
        }
        DeadlineStatus::WindowClosed { closed_at } => {
            let mut d = Diagnostics::new(DiagnosticReason::WindowClosed);
            d.code = Some(DenialCode::WindowClosed);
            d.closed_at = Some(closed_at);
            d
        }
        DeadlineStatus::Locked {
            effective_deadline,
            minutes_late,
        } => {
            let mut d = Diagnostics::new(DiagnosticReason::DeadlinePassed);
            d.code = Some(DenialCode::DeadlinePassed);
            d.effective_deadline = Some(effective_deadline);
            d.minutes_late = Some(minutes_late);
            d.lock_reason = Some(if record.lock_after_deadline {
                LockReason::LockedAfterDeadline
            } else {
                LockReason::LateNotPermitted
            });
            d
        }
        DeadlineStatus::LateAllowed { minutes_late } => {
            let mut d = Diagnostics::new(DiagnosticReason::LateSubmission);
            d.effective_deadline = Some(record.effective_deadline());
            d.minutes_late = Some(minutes_late);
            d
        }
    };

    d.deadline_id = Some(record.id.clone());
    d.deadline_name = Some(record.name.clone());
    d.workflow_type = Some(record.related_to);
    d.phase = Some(phase.as_str().to_string());
    d.match_kind = Some(match_kind);
    Some(d)
}
