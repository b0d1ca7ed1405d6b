//! Console end-to-end tests
//!
//! Drives the `run` command through scripted stdin sessions and
//! asserts on the console's replies. The executor runs with a short
//! poll interval so sessions finish quickly.

mod common;

use std::time::Duration;

use common::{taskmill_cmd, ConfigFixture};
use predicates::prelude::*;

/// Command for one console session fed by a stdin script
fn session(script: &str) -> assert_cmd::Command {
    let mut cmd = taskmill_cmd();
    cmd.arg("run")
        .env("TASKMILL_POLL_INTERVAL_MS", "10")
        .timeout(Duration::from_secs(10))
        .write_stdin(script.to_string());
    cmd
}

// ─────────────────────────────────────────────────────────────────
// Session Lifecycle
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_quit_immediately() {
    session("1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter a command:"))
        .stdout(predicate::str::contains("1: Quit"));
}

#[test]
fn test_eof_ends_session() {
    session("").assert().success();
}

#[test]
fn test_run_with_config_file() {
    let fixture = ConfigFixture::fast();

    let mut cmd = taskmill_cmd();
    cmd.arg("run")
        .arg("--config")
        .arg(fixture.path())
        .timeout(Duration::from_secs(10))
        .write_stdin("1\n".to_string());

    cmd.assert().success();
}

#[test]
fn test_invalid_menu_choice() {
    session("99\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid value"));
}

// ─────────────────────────────────────────────────────────────────
// Scheduling
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_schedule_fibonacci_session() {
    session("5\n1\n6\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter a task type:"))
        .stdout(predicate::str::contains(
            "Enter desired Fibonacci index (1 - n):",
        ))
        .stdout(predicate::str::contains("Fibonacci task scheduled"));
}

#[test]
fn test_schedule_factorial_session() {
    session("5\n2\n5\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Enter desired Factorial base number (1 - n):",
        ))
        .stdout(predicate::str::contains("Factorial task scheduled"));
}

#[test]
fn test_schedule_invalid_task_type() {
    session("5\n9\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid task type"));
}

#[test]
fn test_schedule_rejects_bad_argument() {
    session("5\n1\n0\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unable to schedule task"))
        .stdout(predicate::str::contains(
            "Invalid index (0) for Fibonacci sequence.",
        ));
}

// ─────────────────────────────────────────────────────────────────
// Identity and Gating
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_identity_change() {
    session("2\nadmin\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Identity is now admin"));
}

#[test]
fn test_unknown_identity_reported() {
    session("2\nroot\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unable to accept identity"))
        .stdout(predicate::str::contains("Unknown identity: root"));
}

#[test]
fn test_disable_requires_admin() {
    session("4\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Could not disable executor process",
        ))
        .stdout(predicate::str::contains("Administrator identity required"));
}

#[test]
fn test_admin_can_disable_and_enable() {
    session("2\nadmin\n4\n3\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Executor process is disabled"))
        .stdout(predicate::str::contains("Executor process is enabled"));
}

#[test]
fn test_schedule_refused_while_disabled() {
    session("2\nadmin\n4\n5\n1\n6\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unable to schedule task"))
        .stdout(predicate::str::contains("Task intake is disabled"));
}

// ─────────────────────────────────────────────────────────────────
// Task Views
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_view_current_requires_admin() {
    session("7\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Could not fetch current task info",
        ));
}

#[test]
fn test_view_current_placeholder_as_admin() {
    session("2\nadmin\n7\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("<No task>"));
}

#[test]
fn test_view_completed_empty() {
    session("8\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("--------------------"));
}

#[test]
fn test_cancel_with_no_task() {
    session("2\nadmin\n6\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Done"));
}
