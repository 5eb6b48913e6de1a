//! End-to-end tests for the `phasegate` binary.

mod common;

use common::{PhaseGateProcess, assert_exit_code};
use phasegate::error::ExitCode;
use phasegate::registry::list_template_ids;
use phasegate::types::WorkflowType;

fn check(subject: &str, now: &str, extra: &[&str]) -> std::process::Output {
    let data = PhaseGateProcess::fixture_path("dataset.yaml");
    let mut args = vec![
        "check",
        "--data",
        data.to_str().unwrap(),
        "--subject",
        subject,
        "--now",
        now,
    ];
    args.extend_from_slice(extra);
    PhaseGateProcess::spawn_command(&args)
}

// ============================================================================
// version / templates
// ============================================================================

#[test]
fn version_prints_name_and_version() {
    let output = PhaseGateProcess::spawn_command(&["version"]);
    assert_exit_code(&output, ExitCode::SUCCESS);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("phasegate "), "stdout: {stdout}");
}

#[test]
fn version_json() {
    let output = PhaseGateProcess::spawn_command(&["version", "--format", "json"]);
    assert_exit_code(&output, ExitCode::SUCCESS);
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output should be valid JSON");
    assert_eq!(parsed["name"], "phasegate");
    assert_eq!(parsed["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn templates_for_one_workflow() {
    let output =
        PhaseGateProcess::spawn_command(&["templates", "--workflow", "project1", "--format", "json"]);
    assert_exit_code(&output, ExitCode::SUCCESS);

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output should be valid JSON");
    let workflows = parsed.as_array().unwrap();
    assert_eq!(workflows.len(), 1);
    assert_eq!(workflows[0]["workflow_type"], "project1");

    let ids: Vec<&str> = workflows[0]["templates"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["template_id"].as_str())
        .collect();
    assert!(ids.contains(&"project1_topic_proposal"), "ids: {ids:?}");
    assert_eq!(ids, list_template_ids(WorkflowType::Project1));
}

#[test]
fn templates_human_lists_every_workflow() {
    let output = PhaseGateProcess::spawn_command(&["templates"]);
    assert_exit_code(&output, ExitCode::SUCCESS);
    let stdout = String::from_utf8_lossy(&output.stdout);
    for workflow in ["internship:", "project1:", "project2:"] {
        assert!(stdout.contains(workflow), "missing {workflow} in: {stdout}");
    }
}

// ============================================================================
// evaluate
// ============================================================================

#[test]
fn evaluate_within_grace_is_on_time() {
    let record = PhaseGateProcess::fixture_path("record_topic.yaml");
    let output = PhaseGateProcess::spawn_command(&[
        "evaluate",
        "--record",
        record.to_str().unwrap(),
        "--now",
        "2024-08-01T17:19:59Z",
        "--format",
        "json",
    ]);
    assert_exit_code(&output, ExitCode::SUCCESS);

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output should be valid JSON");
    assert_eq!(parsed["deadline_id"], "p1-topic-2567-1");
    assert_eq!(parsed["status"], "on_time");
    assert_eq!(parsed["effective_deadline"], "2024-08-01T17:29:59Z");
}

#[test]
fn evaluate_after_grace_is_locked() {
    let record = PhaseGateProcess::fixture_path("record_topic.yaml");
    let output = PhaseGateProcess::spawn_command(&[
        "evaluate",
        "--record",
        record.to_str().unwrap(),
        "--now",
        "2024-08-01T17:35:00Z",
        "--format",
        "json",
    ]);
    // Evaluation reports; it never enforces.
    assert_exit_code(&output, ExitCode::SUCCESS);

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output should be valid JSON");
    assert_eq!(parsed["status"], "locked");
    assert_eq!(parsed["minutes_late"], 5);
}

#[test]
fn evaluate_human_output_uses_bangkok_time() {
    let record = PhaseGateProcess::fixture_path("record_topic.yaml");
    let output = PhaseGateProcess::spawn_command(&[
        "evaluate",
        "--record",
        record.to_str().unwrap(),
        "--now",
        "2024-08-01T17:00:00Z",
    ]);
    assert_exit_code(&output, ExitCode::SUCCESS);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Topic proposal (p1-topic-2567-1)"), "stdout: {stdout}");
    assert!(stdout.contains("2024-08-02 00:29"), "stdout: {stdout}");
}

#[test]
fn evaluate_reports_announcement_normalization() {
    let record = PhaseGateProcess::fixture_path("record_announcement.yaml");
    let output = PhaseGateProcess::spawn_command(&[
        "evaluate",
        "--record",
        record.to_str().unwrap(),
        "--now",
        "2024-09-10T03:00:00Z",
        "--format",
        "json",
    ]);
    assert_exit_code(&output, ExitCode::SUCCESS);

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output should be valid JSON");
    let normalized: Vec<&str> = parsed["normalized"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(serde_json::Value::as_str)
        .collect();
    assert_eq!(
        normalized,
        ["accepting_submissions", "allow_late", "lock_after_deadline"]
    );
    assert_eq!(parsed["status"], "locked");
}

#[test]
fn evaluate_rejects_negative_grace() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_file(
        dir.path(),
        "negative.yaml",
        r#"
id: bad
name: Bad grace
related_to: project2
deadline_type: SUBMISSION
academic_year: 2567
semester: 1
deadline_at: "2024-08-15T16:59:59Z"
grace_period_minutes: -1
"#,
    );
    let output = PhaseGateProcess::spawn_command(&[
        "evaluate",
        "--record",
        path.to_str().unwrap(),
        "--now",
        "2024-08-01T00:00:00Z",
    ]);
    assert_exit_code(&output, ExitCode::CONFIG_ERROR);
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("grace period must not be negative"),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn evaluate_rejects_oversized_grace() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_file(
        dir.path(),
        "oversized.yaml",
        r#"
id: huge
name: Huge grace
related_to: project2
deadline_type: SUBMISSION
academic_year: 2567
semester: 1
deadline_at: "2024-08-15T16:59:59Z"
grace_period_minutes: 5000000000
"#,
    );
    let output = PhaseGateProcess::spawn_command(&[
        "evaluate",
        "--record",
        path.to_str().unwrap(),
        "--now",
        "2024-08-01T00:00:00Z",
    ]);
    assert_exit_code(&output, ExitCode::CONFIG_ERROR);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("grace period of 5000000000 minutes is too large"),
        "stderr: {stderr}"
    );
    assert!(!stderr.contains("must not be negative"), "stderr: {stderr}");
}

// ============================================================================
// check
// ============================================================================

#[test]
fn check_allows_within_grace() {
    let output = check("6410000001", "2024-08-01T17:20:00Z", &[]);
    assert_exit_code(&output, ExitCode::SUCCESS);
}

#[test]
fn check_denies_after_grace() {
    let output = check("6410000001", "2024-08-01T17:35:00Z", &["--format", "json"]);
    assert_exit_code(&output, ExitCode::DENIED);

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output should be valid JSON");
    assert_eq!(parsed["allow"], false);
    assert_eq!(parsed["status"]["status"], "locked");
    assert_eq!(parsed["diagnostics"]["code"], "DEADLINE_PASSED");
    assert_eq!(parsed["diagnostics"]["lock_reason"], "locked_after_deadline");
    assert_eq!(parsed["diagnostics"]["minutes_late"], 5);
    assert_eq!(parsed["diagnostics"]["deadline_name"], "Topic proposal");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("action denied for subject 6410000001"),
        "stderr: {stderr}"
    );
}

#[test]
fn check_advisory_never_denies() {
    let output = check(
        "6410000001",
        "2024-08-01T17:35:00Z",
        &["--mode", "advisory", "--format", "json"],
    );
    assert_exit_code(&output, ExitCode::SUCCESS);

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output should be valid JSON");
    assert_eq!(parsed["allow"], true);
    assert_eq!(parsed["diagnostics"]["reason"], "deadline_passed");
}

#[test]
fn check_unknown_subject_is_allowed() {
    let output = check("6499999999", "2024-08-01T17:35:00Z", &["--format", "json"]);
    assert_exit_code(&output, ExitCode::SUCCESS);

    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("output should be valid JSON");
    assert_eq!(parsed["diagnostics"]["reason"], "no_mapping");
}

#[test]
fn check_human_output_names_the_deadline() {
    let output = check("6410000001", "2024-08-01T17:35:00Z", &[]);
    assert_exit_code(&output, ExitCode::DENIED);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("subject:  6410000001"), "stdout: {stdout}");
    assert!(stdout.contains("Topic proposal"), "stdout: {stdout}");
}

#[test]
fn check_writes_audit_events() {
    let dir = tempfile::tempdir().unwrap();
    let events = dir.path().join("events.jsonl");
    let output = check(
        "6410000001",
        "2024-08-01T17:35:00Z",
        &["--events-file", events.to_str().unwrap()],
    );
    assert_exit_code(&output, ExitCode::DENIED);

    let contents = std::fs::read_to_string(&events).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|l| serde_json::from_str(l).expect("each line is JSON"))
        .collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["type"], "DecisionRecorded");
    assert_eq!(lines[0]["sequence"], 0);
    assert_eq!(lines[0]["subject_id"], "6410000001");
    assert_eq!(lines[0]["allow"], false);
    assert_eq!(lines[0]["deadline_id"], "p1-topic-2567-1");
}

#[test]
fn check_missing_dataset_fails() {
    let output = PhaseGateProcess::spawn_command(&[
        "check",
        "--data",
        "/tmp/nonexistent_phasegate_dataset.yaml",
        "--subject",
        "6410000001",
    ]);
    assert_exit_code(&output, ExitCode::CONFIG_ERROR);
}

#[test]
fn check_requires_subject() {
    let data = PhaseGateProcess::fixture_path("dataset.yaml");
    let output = PhaseGateProcess::spawn_command(&["check", "--data", data.to_str().unwrap()]);
    assert!(!output.status.success(), "check without --subject should fail");
}
