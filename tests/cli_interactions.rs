//! CLI interaction tests
//!
//! These exercise argument handling through the real binary. Nothing here
//! touches the network: every case fails validation or exits before the
//! API call would happen.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

/// Helper function to create a test command
fn create_test_cmd() -> Command {
    Command::cargo_bin("wva").unwrap()
}

#[test]
fn test_help_lists_core_options() {
    create_test_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--strategy"))
        .stdout(predicate::str::contains("--project-context"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_version_flag() {
    create_test_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_url_fails() {
    create_test_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("URL").or(predicate::str::contains("url")));
}

#[test]
fn test_invalid_strategy_rejected() {
    create_test_cmd()
        .arg("https://example.com")
        .arg("--strategy")
        .arg("tablet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("strategy"));
}

#[test]
fn test_invalid_url_rejected() {
    create_test_cmd()
        .arg("not-a-url")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_zero_timeout_rejected() {
    create_test_cmd()
        .arg("https://example.com")
        .arg("--timeout")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Timeout"));
}

#[test]
fn test_missing_project_context_file_fails_cleanly() {
    create_test_cmd()
        .arg("https://example.com")
        .arg("--project-context")
        .arg("/nonexistent/context.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}
