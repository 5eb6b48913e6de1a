//! Shared integration-test harness for running the `phasegate` binary and
//! loading dataset fixtures into in-memory stores.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use phasegate::config::ConfigLoader;
use phasegate::store::MemoryStore;

/// 2024-08-01 23:59:59 Asia/Bangkok, the topic proposal deadline in
/// `dataset.yaml`.
pub const TOPIC_DEADLINE: &str = "2024-08-01T16:59:59Z";

/// Runs the `phasegate` binary to completion.
pub struct PhaseGateProcess;

impl PhaseGateProcess {
    /// Runs `phasegate` with `args` and `--quiet`, capturing all output.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        let bin = env!("CARGO_BIN_EXE_phasegate");
        Command::new(bin)
            .args(args)
            .arg("--quiet")
            .env_remove("PHASEGATE_DATA")
            .env_remove("PHASEGATE_MODE")
            .env_remove("PHASEGATE_NOW")
            .env_remove("PHASEGATE_EVENTS_FILE")
            .output()
            .expect("failed to run phasegate")
    }

    /// Path to a file under `tests/fixtures`.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }
}

/// Parses an RFC 3339 instant.
#[allow(clippy::missing_panics_doc)]
pub fn instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC 3339 instant")
        .with_timezone(&Utc)
}

/// `TOPIC_DEADLINE` shifted by `minutes`.
pub fn topic_deadline_plus(minutes: i64) -> DateTime<Utc> {
    instant(TOPIC_DEADLINE) + TimeDelta::minutes(minutes)
}

/// Loads a fixture dataset and materializes its store.
#[allow(clippy::missing_panics_doc)]
pub fn load_store(name: &str) -> Arc<MemoryStore> {
    let path = PhaseGateProcess::fixture_path(name);
    let result = ConfigLoader::default()
        .load(&path)
        .expect("fixture dataset should load");
    Arc::new(result.config.to_store().expect("fixture drafts are valid"))
}

/// Writes `contents` to `name` inside `dir` and returns the path.
#[allow(clippy::missing_panics_doc)]
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write temp file");
    path
}

/// Asserts the process exited with `code`, showing stderr otherwise.
#[allow(clippy::missing_panics_doc)]
pub fn assert_exit_code(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "unexpected exit status\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}
