//! Guarded deletion of a virtualenv directory.
use std::path::{Path, PathBuf};

use crate::environ::{self, Environ};
use crate::error::{Result, VexError, quoted};
use crate::platform::Platform;

/// Facts about the invoking user that decide whether removal is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveGuard {
    /// Whether vex runs with superuser rights.
    pub as_root: bool,
    /// The user's home directory, never removed.
    pub home: Option<PathBuf>,
}

impl RemoveGuard {
    /// Build the guard for the current process.
    #[must_use]
    pub fn from_environ(environ: &Environ, platform: Platform) -> Self {
        Self {
            as_root: running_as_root(environ),
            home: environ::home_dir(environ, platform),
        }
    }
}

/// Whether the effective user is root, or `USER` says so.
///
/// Always `false` where there is no notion of an effective user id.
#[must_use]
pub fn running_as_root(environ: &Environ) -> bool {
    #[cfg(unix)]
    {
        nix::unistd::geteuid().is_root() || environ.get("USER").is_some_and(|u| u == "root")
    }
    #[cfg(not(unix))]
    {
        let _ = environ;
        false
    }
}

/// Delete the virtualenv at `ve_path` after checking it looks like one.
///
/// A path that does not exist is left alone.
///
/// # Errors
///
/// Returns [`VexError::VirtualenvNotRemoved`] when running as root, when
/// the path could be a root or home directory, or when it does not look
/// like a virtualenv, and [`VexError::Io`] if deletion fails.
pub fn handle_remove(ve_path: &Path, guard: &RemoveGuard) -> Result<()> {
    if !ve_path.exists() {
        return Ok(());
    }
    if guard.as_root {
        return Err(VexError::VirtualenvNotRemoved(
            "not removing any directory as root user".to_string(),
        ));
    }
    if matches!(ve_path.to_str(), Some("/" | "\\")) || ve_path.parent().is_none() {
        return Err(VexError::VirtualenvNotRemoved(format!(
            "not removing possible root directory {}",
            quoted(ve_path)
        )));
    }
    if guard.home.as_deref() == Some(ve_path) {
        return Err(VexError::VirtualenvNotRemoved(format!(
            "not removing possible home directory {}",
            quoted(ve_path)
        )));
    }
    if obviously_not_a_virtualenv(ve_path) {
        return Err(VexError::VirtualenvNotRemoved(format!(
            "path {} did not look like a virtualenv",
            quoted(ve_path)
        )));
    }

    tracing::info!("Removing {}", quoted(ve_path));
    std::fs::remove_dir_all(ve_path).map_err(|e| VexError::io("removing", ve_path, e))
}

/// A virtualenv has a `bin` or `Scripts` directory and an `include`
/// directory holding something named `py*`.
fn obviously_not_a_virtualenv(path: &Path) -> bool {
    if !(path.join("bin").exists() || path.join("Scripts").exists()) {
        return true;
    }
    let Ok(entries) = std::fs::read_dir(path.join("include")) else {
        return true;
    };
    !entries
        .filter_map(Result::ok)
        .any(|entry| entry.file_name().to_string_lossy().starts_with("py"))
}
