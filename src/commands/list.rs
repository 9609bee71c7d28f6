//! Command: list the virtualenvs in the virtualenvs directory.
use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::config::{Vexrc, get_ve_base};
use crate::environ::Environ;
use crate::error::{self, VexError, quoted};
use crate::platform::Platform;

/// Write the name of each virtualenv starting with `prefix` to `out`, one
/// per line.
///
/// # Errors
///
/// Returns an error if the virtualenvs directory is unknown or missing, or
/// if writing fails.
pub fn run(
    prefix: &str,
    vexrc: &Vexrc,
    environ: &Environ,
    platform: Platform,
    out: &mut impl Write,
) -> Result<()> {
    let ve_base = get_ve_base(vexrc, environ, platform);
    for name in list_virtualenvs(ve_base.as_deref(), prefix)? {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// Sorted names of the directories directly under `ve_base` that start with
/// `prefix`. Names starting with `-` are skipped.
///
/// # Errors
///
/// Returns [`VexError::NoVirtualenvsDirectory`] when `ve_base` is `None` or
/// does not exist, and [`VexError::Io`] when it cannot be read.
pub fn list_virtualenvs(ve_base: Option<&Path>, prefix: &str) -> error::Result<Vec<String>> {
    let Some(ve_base) = ve_base else {
        return Err(VexError::NoVirtualenvsDirectory(
            "could not figure out a virtualenvs directory".to_string(),
        ));
    };
    if !ve_base.exists() {
        return Err(VexError::NoVirtualenvsDirectory(format!(
            "no virtualenvs directory at {}",
            quoted(ve_base)
        )));
    }
    tracing::debug!("Listing virtualenvs in {}", ve_base.display());

    let entries = std::fs::read_dir(ve_base).map_err(|e| VexError::io("reading", ve_base, e))?;
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(prefix) && !name.starts_with('-'))
        .collect();
    names.sort();
    Ok(names)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn base_with(dirs: &[&str]) -> tempfile::TempDir {
        let base = tempfile::tempdir().unwrap();
        for dir in dirs {
            std::fs::create_dir(base.path().join(dir)).unwrap();
        }
        base
    }

    #[test]
    fn lists_sorted_directories() {
        let base = base_with(&["zeta", "alpha", "mid"]);
        std::fs::write(base.path().join("file"), "").unwrap();
        let names = list_virtualenvs(Some(base.path()), "").unwrap();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn filters_by_prefix() {
        let base = base_with(&["foo", "foobar", "bar"]);
        let names = list_virtualenvs(Some(base.path()), "foo").unwrap();
        assert_eq!(names, ["foo", "foobar"]);
    }

    #[test]
    fn skips_dash_names() {
        let base = base_with(&["-rf", "ok"]);
        assert_eq!(list_virtualenvs(Some(base.path()), "").unwrap(), ["ok"]);
        assert!(list_virtualenvs(Some(base.path()), "-").unwrap().is_empty());
    }

    #[test]
    fn missing_base_is_named_in_error() {
        let base = tempfile::tempdir().unwrap();
        let missing = base.path().join("nope");
        let err = list_virtualenvs(Some(&missing), "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoVirtualenvsDirectory);
        assert!(err.to_string().contains(&missing.display().to_string()));
    }

    #[test]
    fn unknown_base() {
        let err = list_virtualenvs(None, "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoVirtualenvsDirectory);
    }

    #[test]
    fn run_writes_lines() {
        let base = base_with(&["b", "a"]);
        let mut env = Environ::new();
        env.insert("WORKON_HOME".to_string(), base.path().display().to_string());
        let mut out = Vec::new();
        run("", &Vexrc::default(), &env, Platform::detect(), &mut out).unwrap();
        insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r"
        a
        b
        ");
    }
}
