//! Tests for flag handling and error reporting.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_flags() {
    let t = Test::new();

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--sync-convex"))
        .stdout(predicate::str::contains("--apply"));
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.run(&["--version"]);
    assert_success(&output);
    assert_stdout_contains(&output, "authsetup");
}

#[test]
fn test_unknown_flag_fails() {
    let t = Test::new();

    t.cmd().arg("--frobnicate").assert().failure();
    assert!(!t.env_path().exists());
}

#[test]
fn test_unreadable_env_file_reports_error() {
    let t = Test::new();
    std::fs::create_dir(t.env_path()).unwrap();

    let output = t.run(&["--write"]);
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "✗");
}
