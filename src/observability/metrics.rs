//! Metrics recording for `phasegate`.
//!
//! Counters go through the `metrics` facade. Without an installed recorder
//! every call is a no-op; an embedding service installs its own exporter.
//! Label values always come from closed enums, so cardinality is bounded.

use metrics::{counter, describe_counter};

use crate::resolver::StatusKind;

/// Registers metric descriptions with whatever recorder is installed.
pub fn describe_metrics() {
    describe_counter!(
        "phasegate_decisions_total",
        "Enforcement decisions by mode and outcome"
    );
    describe_counter!(
        "phasegate_store_failures_total",
        "Persistence failures seen by the enforcement gate"
    );
    describe_counter!(
        "phasegate_evaluations_total",
        "Deadline evaluations by resulting status"
    );
    describe_counter!(
        "phasegate_overdue_writes_total",
        "Overdue flag writes issued by recomputation"
    );
    describe_counter!(
        "phasegate_blocked_writes_total",
        "Blocked flag writes issued by recomputation"
    );
}

/// Records one gate decision.
pub fn record_decision(mode: &'static str, allow: bool) {
    let outcome = if allow { "allow" } else { "deny" };
    counter!("phasegate_decisions_total", "mode" => mode, "outcome" => outcome).increment(1);
}

/// Records a persistence failure observed by the gate.
pub fn record_store_failure(mode: &'static str) {
    counter!("phasegate_store_failures_total", "mode" => mode).increment(1);
}

/// Records the status produced by one evaluation.
pub fn record_evaluation(kind: StatusKind) {
    counter!("phasegate_evaluations_total", "status" => kind.as_str()).increment(1);
}

/// Records an overdue flag write.
pub fn record_overdue_write() {
    counter!("phasegate_overdue_writes_total").increment(1);
}

/// Records a blocked flag write.
pub fn record_blocked_write() {
    counter!("phasegate_blocked_writes_total").increment(1);
}
