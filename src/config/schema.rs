//! Dataset file schema.
//!
//! A dataset bundles deadline drafts and subject states so the CLI and the
//! integration tests can drive the core without an external database.

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::resolver::DeadlineDraft;
use crate::store::MemoryStore;
use crate::tracker::WorkflowState;

/// Default presentation offset: Asia/Bangkok.
pub const DEFAULT_DISPLAY_OFFSET_HOURS: i32 = 7;

/// Top-level dataset document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    /// Presentation settings.
    #[serde(default)]
    pub settings: Settings,

    /// Deadline drafts, normalized on load.
    #[serde(default)]
    pub deadlines: Vec<DeadlineDraft>,

    /// Subject workflow states.
    #[serde(default)]
    pub subjects: Vec<WorkflowState>,
}

/// Presentation settings. Never consulted during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// UTC offset used when rendering instants for humans.
    #[serde(default = "default_display_offset")]
    pub display_offset_hours: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_offset_hours: DEFAULT_DISPLAY_OFFSET_HOURS,
        }
    }
}

const fn default_display_offset() -> i32 {
    DEFAULT_DISPLAY_OFFSET_HOURS
}

impl DatasetConfig {
    /// Normalizes every draft and loads records and states into a fresh
    /// in-memory store.
    ///
    /// # Errors
    ///
    /// Returns the first [`RecordError`] if a draft is invalid. Validated
    /// datasets never fail here.
    pub fn to_store(&self) -> Result<MemoryStore, RecordError> {
        let records = self
            .deadlines
            .iter()
            .cloned()
            .map(DeadlineDraft::into_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MemoryStore::with_data(records, self.subjects.iter().cloned()))
    }
}
