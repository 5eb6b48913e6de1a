//! Dataset configuration
//!
//! Loads and validates YAML dataset files holding deadline drafts and
//! subject workflow states.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLimits, ConfigLoader, LoadResult, LoadWarning};
pub use schema::{DatasetConfig, Settings};
pub use validation::{ValidationResult, Validator};
