//! Spawning commands with an explicit environment.
use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::environ::{Environ, PATH};
use crate::error::{Result, VexError};
use crate::platform::Platform;

/// Variable virtualenvwrapper's shell hooks read to find a Python.
const WRAPPER_PYTHON: &str = "VIRTUALENVWRAPPER_PYTHON";

/// Outcome of launching a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// The command ran; carries the code vex should exit with.
    Exited(i32),
    /// The executable could not be found.
    NotFound,
}

/// Run `command` with exactly `env` as its environment, optionally in `cwd`,
/// and wait for it.
///
/// Standard streams are inherited. On Windows the executable is looked up in
/// the child's `PATH` first, so a virtualenv's `Scripts` directory is
/// searched. When the program is `bash` or `zsh` and `env` does not set
/// `VIRTUALENVWRAPPER_PYTHON`, it is set to `:` for the child so
/// virtualenvwrapper's startup hooks stay quiet.
///
/// # Errors
///
/// Returns [`VexError::InvalidCommand`] for an empty command and
/// [`VexError::Io`] if spawning fails for a reason other than the program not
/// existing.
pub fn launch(
    command: &[String],
    env: &Environ,
    cwd: Option<&Path>,
    platform: Platform,
) -> Result<Launch> {
    let Some((program, args)) = command.split_first() else {
        return Err(VexError::InvalidCommand("no command given".to_string()));
    };

    let mut cmd = if platform.is_windows() {
        let search_dir = match cwd {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir()
                .map_err(|e| VexError::io("reading", Path::new("."), e))?,
        };
        match which::which_in(program, env.get(PATH), search_dir) {
            Ok(found) => Command::new(found),
            Err(_) => return Ok(Launch::NotFound),
        }
    } else {
        Command::new(program)
    };

    cmd.args(args).env_clear().envs(env);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    if is_wrapper_shell(program) && !env.contains_key(WRAPPER_PYTHON) {
        cmd.env(WRAPPER_PYTHON, ":");
    }

    tracing::debug!("Running {}", command.join(" "));
    match cmd.status() {
        Ok(status) => Ok(Launch::Exited(exit_code(status))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Launch::NotFound),
        Err(e) => Err(VexError::io("running", Path::new(program), e)),
    }
}

fn is_wrapper_shell(program: &str) -> bool {
    let name = Path::new(program)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(program);
    matches!(name, "bash" | "zsh")
}

/// Exit code to report for a finished child: its own code, or `128 + signal`
/// when a signal killed it.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn host_env() -> Environ {
        let mut env = Environ::new();
        if let Ok(path) = std::env::var("PATH") {
            env.insert("PATH".to_string(), path);
        }
        env
    }

    fn command(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn empty_command_is_invalid() {
        let err = launch(&[], &host_env(), None, Platform::detect()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidCommand);
    }

    #[test]
    fn missing_program_is_not_found() {
        let result = launch(
            &command(&["this-program-does-not-exist-12345"]),
            &host_env(),
            None,
            Platform::detect(),
        )
        .unwrap();
        assert_eq!(result, Launch::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_is_passed_through() {
        let result = launch(
            &command(&["sh", "-c", "exit 3"]),
            &host_env(),
            None,
            Platform::detect(),
        )
        .unwrap();
        assert_eq!(result, Launch::Exited(3));
    }

    #[cfg(unix)]
    #[test]
    fn child_sees_only_given_environment() {
        let mut env = host_env();
        env.insert("VEX_TEST_VALUE".to_string(), "bar".to_string());
        let script = r#"test "$VEX_TEST_VALUE" = bar && test -z "$HOME""#;
        let result = launch(&command(&["sh", "-c", script]), &env, None, Platform::detect()).unwrap();
        assert_eq!(result, Launch::Exited(0));
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker"), "").unwrap();
        let result = launch(
            &command(&["sh", "-c", "test -f marker"]),
            &host_env(),
            Some(dir.path()),
            Platform::detect(),
        )
        .unwrap();
        assert_eq!(result, Launch::Exited(0));
    }

    #[cfg(unix)]
    #[test]
    fn signal_maps_to_128_plus() {
        let result = launch(
            &command(&["sh", "-c", "kill -TERM $$"]),
            &host_env(),
            None,
            Platform::detect(),
        )
        .unwrap();
        assert_eq!(result, Launch::Exited(128 + 15));
    }

    #[test]
    fn wrapper_shells() {
        assert!(is_wrapper_shell("bash"));
        assert!(is_wrapper_shell("/bin/zsh"));
        assert!(!is_wrapper_shell("fish"));
        assert!(!is_wrapper_shell("python"));
    }
}
