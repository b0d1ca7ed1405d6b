//! Integration test harness
//!
//! End-to-end runs of the binary: full workflows, error exit codes,
//! log file creation, and a couple of coarse performance checks.

mod common;

use std::fs;
use std::time::Duration;

use common::{taskmill_cmd, ConfigFixture};
use predicates::prelude::*;

// ─────────────────────────────────────────────────────────────────
// End-to-End Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_full_config_workflow() {
    let fixture = ConfigFixture::fast();

    // 1. Show config
    taskmill_cmd()
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("poll_interval_ms = 10"));

    // 2. Validate config
    taskmill_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .success();

    // 3. Run the demo against it
    taskmill_cmd()
        .arg("demo")
        .arg("--config")
        .arg(fixture.path())
        .timeout(Duration::from_secs(10))
        .assert()
        .success()
        .stdout(predicate::str::contains("State: COMPLETED"));
}

#[test]
fn test_demo_report_framing() {
    let output = taskmill_cmd()
        .arg("demo")
        .env("TASKMILL_POLL_INTERVAL_MS", "10")
        .timeout(Duration::from_secs(10))
        .assert()
        .success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();

    // Two task blocks, each preceded by a delimiter, plus the trailing one
    let delimiters = stdout.matches("--------------------\n").count();
    assert_eq!(delimiters, 3, "report framing off:\n{}", stdout);

    // Fibonacci was scheduled first, so it renders first
    let fib_at = stdout.find("Type: Fibonacci").unwrap();
    let fact_at = stdout.find("Type: Factorial").unwrap();
    assert!(fib_at < fact_at);
}

#[test]
fn test_log_file_creation() {
    let fixture = ConfigFixture::new();
    let log_dir = fixture.dir().join("logs");
    fixture.write_config(&format!(
        r#"
[executor]
poll_interval_ms = 10

[logging]
level = "debug"
file = "{}"
"#,
        log_dir.join("taskmill.log").display()
    ));

    taskmill_cmd()
        .arg("run")
        .arg("--config")
        .arg(fixture.path())
        .timeout(Duration::from_secs(10))
        .write_stdin("1\n".to_string())
        .assert()
        .success();

    // The file layer creates the directory up front and flushes on exit
    assert!(log_dir.exists());
    let entries = fs::read_dir(&log_dir).unwrap().count();
    assert!(entries >= 1, "expected a rotated log file in {:?}", log_dir);
}

// ─────────────────────────────────────────────────────────────────
// Error Scenario Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_error_exit_codes() {
    // Config not found should return specific exit code
    let result = taskmill_cmd()
        .arg("run")
        .arg("--config")
        .arg("/nonexistent/path/config.toml")
        .assert()
        .failure();

    // Exit code should be in the config error range (10)
    let exit_code = result.get_output().status.code().unwrap_or(1);
    assert_eq!(exit_code, 10, "Expected config error exit code (10)");
}

#[test]
fn test_invalid_config_exit_code() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[executor]
poll_interval_ms = 0
"#,
    );

    let result = taskmill_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .failure();

    // Should be config validation error (exit code 10)
    let exit_code = result.get_output().status.code().unwrap_or(1);
    assert_eq!(exit_code, 10);
}

// ─────────────────────────────────────────────────────────────────
// Performance Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_startup_time() {
    use std::time::Instant;

    let start = Instant::now();

    taskmill_cmd().arg("version").assert().success();

    let elapsed = start.elapsed();

    // Version command should complete in under 1 second
    assert!(
        elapsed < Duration::from_secs(1),
        "Startup too slow: {:?}",
        elapsed
    );
}

#[test]
fn test_config_parse_time() {
    use std::time::Instant;

    let fixture = ConfigFixture::fast();

    let start = Instant::now();

    taskmill_cmd()
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .success();

    let elapsed = start.elapsed();

    // Config parsing should be fast
    assert!(
        elapsed < Duration::from_millis(500),
        "Config parsing too slow: {:?}",
        elapsed
    );
}

// ─────────────────────────────────────────────────────────────────
// Concurrent Access Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_concurrent_config_reads() {
    use std::thread;

    let fixture = ConfigFixture::fast();
    let config_path = fixture.path().to_string();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let path = config_path.clone();
            thread::spawn(move || {
                taskmill_cmd()
                    .arg("config")
                    .arg("validate")
                    .arg("--config")
                    .arg(&path)
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
}
