//! Explicit environment mappings.
//!
//! vex never reads or writes the process environment after startup: `main`
//! snapshots it once into an [`Environ`], and everything downstream takes that
//! mapping as an argument and returns new mappings instead of mutating.
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::platform::{Os, Platform};

/// A snapshot of environment variables.
pub type Environ = BTreeMap<String, String>;

/// Base directory override, as used by virtualenvwrapper.
pub const WORKON_HOME: &str = "WORKON_HOME";
/// Marker naming the active virtualenv.
pub const VIRTUAL_ENV: &str = "VIRTUAL_ENV";
/// Interpreter standard-library override that breaks virtualenvs.
pub const PYTHONHOME: &str = "PYTHONHOME";
/// Executable search path.
pub const PATH: &str = "PATH";
/// User's login shell.
pub const SHELL: &str = "SHELL";

/// Snapshot the current process environment.
///
/// Variables whose name or value is not valid Unicode are skipped.
#[must_use]
pub fn from_process() -> Environ {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Look up a variable, treating an empty value as unset.
#[must_use]
pub fn non_empty<'a>(environ: &'a Environ, key: &str) -> Option<&'a str> {
    environ.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

/// Determine the user's home directory.
///
/// Posix uses `HOME`. Windows uses `HOMEDRIVE` + `HOMEPATH` when both are
/// set, and otherwise asks the OS.
#[must_use]
pub fn home_dir(environ: &Environ, platform: Platform) -> Option<PathBuf> {
    match platform.os {
        Os::Posix => non_empty(environ, "HOME").map(PathBuf::from),
        Os::Windows => match (
            non_empty(environ, "HOMEDRIVE"),
            non_empty(environ, "HOMEPATH"),
        ) {
            (Some(drive), Some(path)) => Some(PathBuf::from(format!("{drive}{path}"))),
            _ => dirs::home_dir(),
        },
    }
}

/// Expand a leading `~` (alone or followed by a separator) to the home
/// directory. Anything else, including `~user`, is returned unchanged, as is
/// the input when no home directory is known.
#[must_use]
pub fn expand_user(path: &str, environ: &Environ, platform: Platform) -> PathBuf {
    let Some(rest) = path.strip_prefix('~') else {
        return PathBuf::from(path);
    };
    let is_sep = |c: char| c == '/' || c == platform.path_separator();
    if !(rest.is_empty() || rest.starts_with(is_sep)) {
        return PathBuf::from(path);
    }
    match home_dir(environ, platform) {
        Some(home) => {
            let rest = rest.trim_start_matches(is_sep);
            if rest.is_empty() {
                home
            } else {
                home.join(rest)
            }
        }
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn environ(pairs: &[(&str, &str)]) -> Environ {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    const POSIX: Platform = Platform::new(Os::Posix);
    const WINDOWS: Platform = Platform::new(Os::Windows);

    #[test]
    fn non_empty_treats_blank_as_unset() {
        let env = environ(&[("A", ""), ("B", "x")]);
        assert_eq!(non_empty(&env, "A"), None);
        assert_eq!(non_empty(&env, "B"), Some("x"));
        assert_eq!(non_empty(&env, "C"), None);
    }

    #[test]
    fn home_dir_posix_uses_home() {
        let env = environ(&[("HOME", "/home/user")]);
        assert_eq!(home_dir(&env, POSIX), Some(PathBuf::from("/home/user")));
        assert_eq!(home_dir(&Environ::new(), POSIX), None);
    }

    #[test]
    fn home_dir_windows_uses_drive_and_path() {
        let env = environ(&[("HOMEDRIVE", "C:"), ("HOMEPATH", "\\Users\\foo")]);
        let home = home_dir(&env, WINDOWS).unwrap();
        assert!(home.to_string_lossy().starts_with("C:"));
    }

    #[test]
    fn expand_user_replaces_leading_tilde() {
        let env = environ(&[("HOME", "/home/user")]);
        assert_eq!(
            expand_user("~/envs", &env, POSIX),
            PathBuf::from("/home/user/envs")
        );
        assert_eq!(expand_user("~", &env, POSIX), PathBuf::from("/home/user"));
    }

    #[test]
    fn expand_user_leaves_other_paths_alone() {
        let env = environ(&[("HOME", "/home/user")]);
        assert_eq!(expand_user("/abs", &env, POSIX), PathBuf::from("/abs"));
        assert_eq!(
            expand_user("~other/x", &env, POSIX),
            PathBuf::from("~other/x")
        );
        assert_eq!(
            expand_user("~/x", &Environ::new(), POSIX),
            PathBuf::from("~/x")
        );
    }
}
