//! Logging initialization for `phasegate`.
//!
//! Structured logging via `tracing` on stderr, human-readable or JSON.
//! `-v` flags raise the level of this crate only; dependencies stay at
//! `warn`. A non-blank `PHASEGATE_LOG_LEVEL` replaces the whole directive.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// Environment variable holding a full `EnvFilter` directive.
pub const LOG_LEVEL_ENV: &str = "PHASEGATE_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with optional ANSI colors.
    #[default]
    Human,
    /// Newline-delimited JSON for machine consumption.
    Json,
}

/// Maps a verbosity level to a tracing level name.
///
/// - 0 → `"warn"`
/// - 1 → `"info"`
/// - 2 → `"debug"`
/// - 3+ → `"trace"` (saturates)
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Directive for a verbosity level, scoped to the `phasegate` target.
#[must_use]
pub fn default_directive(verbosity: u8) -> String {
    match verbosity_to_directive(verbosity) {
        "warn" => "warn".to_string(),
        level => format!("warn,phasegate={level}"),
    }
}

/// Picks the filter directive: a non-blank override wins over verbosity.
#[must_use]
pub fn select_directive(override_value: Option<&str>, verbosity: u8) -> String {
    match override_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default_directive(verbosity),
    }
}

/// Initializes the global tracing subscriber on stderr.
///
/// An override that does not parse falls back to the verbosity directive.
/// Uses `try_init()`, so calling this more than once is harmless.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let override_value = std::env::var(LOG_LEVEL_ENV).ok();
    let directive = select_directive(override_value.as_deref(), verbosity);
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let show_target = verbosity >= 2;

    let use_ansi = match color {
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    match format {
        LogFormat::Human => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(use_ansi)
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogFormat::Json => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_target(show_target)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
