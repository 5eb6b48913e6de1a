//! Observability module
//!
//! Logging, metrics, and structured audit events for deadline evaluation.

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{Event, EventEmitter};
pub use logging::{LogFormat, init_logging};
pub use metrics::describe_metrics;
