#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Integration tests for `--remove`.
//!
//! Removal is refused for the superuser, so the expected outcome depends on
//! who runs the suite.

mod common;

use common::{IntegrationTestContext, TestContextBuilder};
use vex::environ::Environ;

fn as_root() -> bool {
    vex::remove::running_as_root(&Environ::new())
}

#[cfg(unix)]
#[test]
fn remove_after_running() {
    let ctx = TestContextBuilder::new().with_venv("doomed").build();
    let out = ctx.vex().args(&["--remove", "doomed", "true"]).run();
    let ve = ctx.venv("doomed");
    if as_root() {
        assert_eq!(out.code, Some(1));
        assert!(out.stderr.contains("root"), "stderr: {}", out.stderr);
        assert!(ve.exists());
    } else {
        assert_eq!(out.code, Some(0), "stderr: {}", out.stderr);
        assert!(out.stdout.contains("Removing"), "stdout: {}", out.stdout);
        assert!(!ve.exists());
    }
}

#[cfg(unix)]
#[test]
fn remove_refuses_non_virtualenv() {
    let ctx = IntegrationTestContext::new();
    let dir = ctx.venv("plain");
    std::fs::create_dir_all(dir.join("bin")).unwrap();
    std::fs::create_dir_all(dir.join("data")).unwrap();
    let out = ctx.vex().args(&["--remove", "plain", "true"]).run();
    assert_eq!(out.code, Some(1));
    let expected = if as_root() { "root" } else { "did not look like a virtualenv" };
    assert!(out.stderr.contains(expected), "stderr: {}", out.stderr);
    assert!(dir.join("data").exists());
}

#[cfg(unix)]
#[test]
fn remove_happens_even_if_command_missing() {
    let ctx = TestContextBuilder::new().with_venv("doomed").build();
    let out = ctx
        .vex()
        .args(&["-r", "doomed", "this-program-does-not-exist-12345"])
        .run();
    assert_eq!(out.code, Some(1));
    if !as_root() {
        assert!(!ctx.venv("doomed").exists());
        assert!(out.stderr.contains("command not found"), "stderr: {}", out.stderr);
    }
}
