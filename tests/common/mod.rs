// Shared helpers for integration tests.
//
// Provides a temporary home directory with a virtualenvs directory, a fluent
// builder for fake virtualenvs and config files, and a runner that drives the
// built `vex` binary with a scrubbed environment and a timeout.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use vex::platform::Platform;

/// How long a single `vex` invocation may take before it is killed.
pub const TIMEOUT: Duration = Duration::from_secs(30);

/// Captured result of one `vex` invocation.
#[derive(Debug)]
pub struct RunOutput {
    /// Exit code, or `None` if the process was killed.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// An isolated home directory backed by a [`tempfile::TempDir`].
///
/// Holds `home/` (used as `$HOME`) and `home/.virtualenvs/`.
pub struct IntegrationTestContext {
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with an empty virtualenvs directory.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("home").join(".virtualenvs"))
            .expect("create virtualenvs dir");
        Self { root }
    }

    /// Path used as `$HOME`.
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// Default virtualenvs directory under the fake home.
    pub fn ve_base(&self) -> PathBuf {
        self.home().join(".virtualenvs")
    }

    /// Path of the virtualenv called `name`.
    pub fn venv(&self, name: &str) -> PathBuf {
        self.ve_base().join(name)
    }

    /// Start a `vex` invocation with `HOME` and `PATH` only.
    pub fn vex(&self) -> VexCommand {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_vex"));
        cmd.env_clear()
            .env("HOME", self.home())
            .current_dir(self.root.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(path) = std::env::var_os("PATH") {
            cmd.env("PATH", path);
        }
        if cfg!(windows) {
            for key in ["SYSTEMROOT", "HOMEDRIVE", "HOMEPATH", "PATHEXT", "COMSPEC"] {
                if let Some(value) = std::env::var_os(key) {
                    cmd.env(key, value);
                }
            }
        }
        VexCommand { cmd }
    }
}

/// Create a directory that passes the "looks like a virtualenv" checks.
pub fn make_fake_venv(path: &Path) {
    std::fs::create_dir_all(path.join(Platform::detect().scripts_dir()))
        .expect("create scripts dir");
    std::fs::create_dir_all(path.join("include").join("python3.12")).expect("create include dir");
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context with an empty virtualenvs directory.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Add a fake virtualenv called `name` to the virtualenvs directory.
    pub fn with_venv(self, name: &str) -> Self {
        make_fake_venv(&self.ctx.venv(name));
        self
    }

    /// Write `content` to `~/.vexrc`.
    pub fn with_vexrc(self, content: &str) -> Self {
        std::fs::write(self.ctx.home().join(".vexrc"), content).expect("write .vexrc");
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

/// A `vex` command under construction.
pub struct VexCommand {
    cmd: Command,
}

impl VexCommand {
    /// Append arguments.
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Set an environment variable for vex.
    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run to completion, killing the process if it outlives [`TIMEOUT`].
    pub fn run(mut self) -> RunOutput {
        let mut child = self.cmd.spawn().expect("spawn vex");
        let mut stdout = child.stdout.take().expect("piped stdout");
        let mut stderr = child.stderr.take().expect("piped stderr");

        // Drain the pipes on threads so a chatty child cannot block on a full pipe.
        let out_reader = std::thread::spawn(move || {
            let mut buf = String::new();
            stdout.read_to_string(&mut buf).ok();
            buf
        });
        let err_reader = std::thread::spawn(move || {
            let mut buf = String::new();
            stderr.read_to_string(&mut buf).ok();
            buf
        });

        let start = Instant::now();
        let code = loop {
            if let Some(status) = child.try_wait().expect("poll vex") {
                break status.code();
            }
            if start.elapsed() > TIMEOUT {
                child.kill().ok();
                child.wait().ok();
                break None;
            }
            std::thread::sleep(Duration::from_millis(10));
        };

        RunOutput {
            code,
            stdout: out_reader.join().expect("join stdout reader"),
            stderr: err_reader.join().expect("join stderr reader"),
        }
    }
}
