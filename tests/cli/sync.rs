//! Tests for `--sync-convex`, `--setup` and `--apply`.

use crate::support::*;
use std::net::TcpListener;

fn closed_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[test]
fn test_sync_dry_run_lists_keys() {
    let t = Test::with_env("AUTH_SECRET=\"abc\"\nAUTH_GITHUB_ID=gh-id\nUNRELATED=1\n");

    let output = t.run(&["--sync-convex"]);
    assert_success(&output);
    assert_stdout_contains(&output, "AUTH_SECRET");
    assert_stdout_contains(&output, "AUTH_GITHUB_ID");
    assert_stdout_contains(&output, "--apply");
    assert_stdout_excludes(&output, "UNRELATED");
    assert_stdout_excludes(&output, "abc");
}

#[test]
fn test_sync_derives_site_url() {
    let t = Test::with_env(CLOUD_ENV);

    let output = t.run(&["--sync-convex"]);
    assert_success(&output);
    assert_stdout_contains(&output, "CONVEX_SITE_URL");
}

#[test]
fn test_sync_without_candidates() {
    let t = Test::with_env("UNRELATED=1\n");

    let output = t.run(&["--sync-convex", "--apply"]);
    assert_success(&output);
    assert_stdout_contains(&output, "nothing to sync");
}

#[test]
fn test_sync_only_does_not_print_or_write_secrets() {
    let t = Test::with_env("UNRELATED=1\n");

    let output = t.run(&["--sync-convex"]);
    assert_success(&output);
    assert_stdout_excludes(&output, "JWT_PRIVATE_KEY=");
    assert_eq!(t.read_env(), "UNRELATED=1\n");
}

#[test]
fn test_sync_unreachable_backend_exits_one() {
    let t = Test::with_env(&format!(
        "NEXT_PUBLIC_CONVEX_URL={}\nAUTH_SECRET=abc\n",
        closed_local_url()
    ));

    let output = t.run(&["--sync-convex", "--apply"]);
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "not reachable");
    assert_stderr_contains(&output, "npx convex dev");
    assert!(t.convex_calls().is_empty());
}

#[test]
fn test_sync_reachable_backend_proceeds() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let t = Test::with_env(&format!(
        "NEXT_PUBLIC_CONVEX_URL=http://127.0.0.1:{}\nAUTH_SECRET=abc\n",
        port
    ));

    let output = t.run(&["--sync-convex"]);
    assert_success(&output);
    assert_stdout_contains(&output, "AUTH_SECRET");
}

#[test]
fn test_apply_missing_cli_fails() {
    let t = Test::with_env("AUTH_SECRET=abc\n");

    let output = t.run(&[
        "--sync-convex",
        "--apply",
        "--convex-bin",
        "authsetup-missing-convex",
    ]);
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "failed to run authsetup-missing-convex");
}

#[cfg(unix)]
#[test]
fn test_setup_apply_pushes_all_values() {
    let t = Test::with_env(CLOUD_ENV);
    t.install_fake_convex();

    let output = t.run(&["--setup", "--apply"]);
    assert_success(&output);
    assert_stdout_contains(&output, "wrote");
    assert_stdout_contains(&output, "set JWKS");
    assert_stdout_contains(&output, "synced 5 variables");

    let mut expected = vec!["CONVEX_SITE_URL"];
    expected.extend_from_slice(GENERATED_KEYS);
    assert_eq!(t.convex_calls(), expected);
}

#[cfg(unix)]
#[test]
fn test_apply_stops_at_first_failure() {
    let t = Test::with_env("JWKS={}\nAUTH_SECRET=abc\nSITE_URL=http://localhost:3000\n");
    t.install_fake_convex();

    let output = t
        .cmd()
        .env("FAKE_CONVEX_FAIL_KEY", "AUTH_SECRET")
        .args(["--sync-convex", "--apply"])
        .output()
        .unwrap();

    assert_exit_code(&output, 3);
    assert_stderr_contains(&output, "boom AUTH_SECRET");
    assert_stderr_contains(&output, "convex env set AUTH_SECRET failed");
    assert_eq!(t.convex_calls(), vec!["JWKS", "AUTH_SECRET"]);
}

#[cfg(unix)]
#[test]
fn test_dry_run_never_invokes_cli() {
    let t = Test::with_env(CLOUD_ENV);
    t.install_fake_convex();

    let output = t.run(&["--setup"]);
    assert_success(&output);
    assert!(t.convex_calls().is_empty());
}
