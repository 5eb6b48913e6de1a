//! `phasegate` - Deadline evaluation and phase-gated enforcement
//!
//! Decides whether a student may perform a phase-gated action in an
//! academic workflow (internship, capstone project phases 1 and 2) given
//! staff-configured deadlines, and maintains per-subject overdue and
//! blocked caches.
//!
//! Every evaluation takes the current instant as an argument; nothing in
//! the library reads a clock.

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod gate;
pub mod observability;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod tracker;
pub mod types;
