//! Command-line interface
//!
//! Argument parsing and command handlers for the `phasegate` binary.

pub mod args;
pub mod commands;
