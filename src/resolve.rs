//! Turning command-line input into a validated virtualenv, working directory
//! and command.
//!
//! The positional arguments arrive as one list: the virtualenv name followed
//! by the command. [`take_virtualenv_name`] consumes the name from the front
//! of that list, and [`get_command`] takes ownership of what is left, so the
//! name can never be mistaken for part of the command.
use std::path::{Path, PathBuf};

use crate::config::Vexrc;
use crate::environ::Environ;
use crate::error::{Result, VexError, quoted};

/// The virtualenv a command will run in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Absolute path of the virtualenv directory.
    pub path: PathBuf,
    /// Name used to find it (the final path component for `--path`).
    pub name: String,
}

impl ResolvedTarget {
    /// Build a target from an absolute path, naming it after its last component.
    #[must_use]
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self { path, name }
    }
}

/// Remove and return the virtualenv name from the front of `rest`.
///
/// # Errors
///
/// - [`VexError::NoVirtualenvName`] when `rest` is empty or starts with an
///   empty string.
/// - [`VexError::UnknownArguments`] when the name looks like a flag.
pub fn take_virtualenv_name(rest: &mut Vec<String>) -> Result<String> {
    let name = rest.first().map_or("", String::as_str);
    if name.is_empty() {
        return Err(VexError::NoVirtualenvName(
            "could not find a virtualenv name in the command line.".to_string(),
        ));
    }
    if name.starts_with('-') {
        return Err(VexError::UnknownArguments(format!("unknown args: [{name:?}]")));
    }
    Ok(rest.remove(0))
}

/// Find the virtualenv called `ve_name` under `ve_base`.
///
/// # Errors
///
/// - [`VexError::NoVirtualenvsDirectory`] when there is no base directory or
///   it does not exist.
/// - [`VexError::InvalidVirtualenv`] when the name is empty, is an absolute
///   path that would silently replace the base directory, or names nothing
///   on disk.
pub fn get_virtualenv_path(ve_base: Option<&Path>, ve_name: &str) -> Result<PathBuf> {
    let Some(ve_base) = ve_base else {
        return Err(VexError::NoVirtualenvsDirectory(
            "could not figure out a virtualenvs directory. \
             make sure $HOME is set, or $WORKON_HOME, \
             or set virtualenvs=something in your .vexrc"
                .to_string(),
        ));
    };

    if !ve_base.exists() {
        return Err(VexError::NoVirtualenvsDirectory(format!(
            "virtualenvs directory {} not found. \
             Create it or use vex --make to get started.",
            quoted(ve_base)
        )));
    }

    if ve_name.is_empty() {
        return Err(VexError::InvalidVirtualenv("no virtualenv name".to_string()));
    }

    // Joining an absolute name discards the base. A bare relative name still
    // works when the base is empty, since then the join is the name itself.
    let name_path = Path::new(ve_name);
    let ve_path = ve_base.join(name_path);
    let absorbed = ve_path == name_path
        && name_path.file_name().is_none_or(|base| base != name_path.as_os_str());
    if absorbed {
        return Err(VexError::InvalidVirtualenv(format!(
            "To run in a virtualenv by its path, use \"vex --path {}\"",
            ve_path.display()
        )));
    }

    let ve_path = absolutize(&ve_path)?;
    if !ve_path.is_dir() {
        return Err(VexError::InvalidVirtualenv(format!(
            "no virtualenv found at {}.",
            quoted(&ve_path)
        )));
    }
    Ok(ve_path)
}

/// Validate a virtualenv given by explicit path. It is never joined with a
/// base directory.
///
/// # Errors
///
/// Returns [`VexError::InvalidVirtualenv`] when the path is not an existing
/// directory.
pub fn get_explicit_path(path: &Path) -> Result<PathBuf> {
    let ve_path = absolutize(path)?;
    if !ve_path.is_dir() {
        return Err(VexError::InvalidVirtualenv(format!(
            "no virtualenv found at {}.",
            quoted(&ve_path)
        )));
    }
    Ok(ve_path)
}

/// Make `path` absolute against the current directory without touching
/// symlinks.
///
/// # Errors
///
/// Returns [`VexError::InvalidVirtualenv`] for an empty path.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|_| {
        VexError::InvalidVirtualenv(format!("invalid virtualenv path {}", quoted(path)))
    })
}

/// Check the directory the command should run in.
///
/// # Errors
///
/// Returns [`VexError::InvalidCwd`] if `cwd` is given but does not exist.
pub fn get_cwd(cwd: Option<&Path>) -> Result<Option<PathBuf>> {
    match cwd {
        None => Ok(None),
        Some(dir) if dir.exists() => Ok(Some(dir.to_path_buf())),
        Some(dir) => Err(VexError::InvalidCwd(format!(
            "can't --cwd to invalid path {}",
            quoted(dir)
        ))),
    }
}

/// Decide what to run: the remaining arguments, else the configured shell.
///
/// # Errors
///
/// Returns [`VexError::InvalidCommand`] when the first word is a `--flag` or
/// there is nothing to run, and [`VexError::InvalidVexrc`] when the fallback
/// shell command cannot be split into words.
pub fn get_command(rest: Vec<String>, vexrc: &Vexrc, environ: &Environ) -> Result<Vec<String>> {
    let command = if rest.is_empty() {
        vexrc.get_shell(environ)?.unwrap_or_default()
    } else {
        rest
    };
    match command.first() {
        None => Err(VexError::InvalidCommand("no command given".to_string())),
        Some(first) if first.starts_with("--") => Err(VexError::InvalidCommand(format!(
            "don't put flags like '{first}' after the virtualenv name."
        ))),
        Some(_) => Ok(command),
    }
}
