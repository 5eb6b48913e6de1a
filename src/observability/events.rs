//! Structured audit events.
//!
//! Discrete, typed events emitted by the gate and the tracker. Events are
//! serialized as newline-delimited JSON (JSONL) with a monotonically
//! increasing sequence number. Timestamps are the caller-supplied
//! evaluation instant, never the wall clock.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during evaluation.
///
/// Each variant is tagged with `"type"` when serialized.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The enforcement gate produced a decision.
    DecisionRecorded {
        /// Evaluation instant.
        timestamp: DateTime<Utc>,
        /// Subject the decision is for.
        subject_id: String,
        /// `"enforcing"` or `"advisory"`.
        mode: String,
        /// Whether the action was allowed.
        allow: bool,
        /// Status label, if a deadline was evaluated.
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<String>,
        /// Deadline record used, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        deadline_id: Option<String>,
    },

    /// A persistence failure prevented evaluation.
    EnforcementUnavailable {
        /// Evaluation instant.
        timestamp: DateTime<Utc>,
        /// Subject the check was for.
        subject_id: String,
        /// `"enforcing"` or `"advisory"`.
        mode: String,
        /// Whether the gate denied because of the failure.
        failed_closed: bool,
    },

    /// A subject's cached overdue flag was rewritten.
    OverdueFlagChanged {
        /// Evaluation instant.
        timestamp: DateTime<Utc>,
        /// Subject whose flag changed.
        subject_id: String,
        /// New value.
        is_overdue: bool,
    },

    /// A subject's cached blocked flag was rewritten.
    BlockedFlagChanged {
        /// Evaluation instant.
        timestamp: DateTime<Utc>,
        /// Subject whose flag changed.
        subject_id: String,
        /// New value.
        is_blocked: bool,
    },

    /// A batch recompute over every subject finished.
    RecomputeCompleted {
        /// Evaluation instant.
        timestamp: DateTime<Utc>,
        /// Subjects recomputed.
        processed: usize,
        /// Subjects that failed.
        failures: usize,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    sequence: u64,
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Serialization or I/O failures are dropped; auditing must never change a
/// decision.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
