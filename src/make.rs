//! Creating a virtualenv with the external `virtualenv` tool.
use std::path::Path;

use crate::environ::Environ;
use crate::error::{Result, VexError, quoted};
use crate::exec::{self, Launch};
use crate::platform::Platform;

const PYDOC_SCRIPT: &str = "#!/usr/bin/env python\nfrom pydoc import cli\ncli()\n";

const PYDOC_BATCH: &str = "\n@python -m pydoc %*\n";

/// Options passed through to `virtualenv`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MakeOptions {
    /// Interpreter for the new virtualenv (`--python`).
    pub python: Option<String>,
    /// Give access to the global site-packages (`--system-site-packages`).
    pub site_packages: bool,
    /// Copy files instead of symlinking (`--always-copy`).
    pub always_copy: bool,
    /// Skip installing wheel (`--no-wheel`).
    pub no_wheel: bool,
}

impl MakeOptions {
    /// Arguments for a `virtualenv` invocation creating `make_path`.
    #[must_use]
    pub fn virtualenv_args(&self, make_path: &Path) -> Vec<String> {
        let mut args = vec!["virtualenv".to_string(), make_path.display().to_string()];
        if let Some(python) = &self.python {
            args.push("--python".to_string());
            args.push(python.clone());
        }
        if self.site_packages {
            args.push("--system-site-packages".to_string());
        }
        if self.always_copy {
            args.push("--always-copy".to_string());
        }
        if self.no_wheel {
            args.push("--no-wheel".to_string());
        }
        args
    }
}

/// Create a new virtualenv at `make_path` and add a `pydoc` shim to it.
///
/// The parent directory is created if missing and `virtualenv` runs inside
/// it with `environ` as its environment.
///
/// # Errors
///
/// - [`VexError::VirtualenvAlreadyMade`] if `make_path` exists.
/// - [`VexError::VirtualenvNotMade`] if the parent is not a directory, or
///   `virtualenv` is missing or fails.
/// - [`VexError::Io`] if a directory or the shim cannot be written.
pub fn handle_make(
    make_path: &Path,
    options: &MakeOptions,
    environ: &Environ,
    platform: Platform,
) -> Result<()> {
    if make_path.exists() {
        return Err(VexError::VirtualenvAlreadyMade(format!(
            "virtualenv already exists: {}",
            quoted(make_path)
        )));
    }

    let Some(ve_base) = make_path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Err(VexError::VirtualenvNotMade(format!(
            "could not make virtualenv: no parent directory for {}",
            quoted(make_path)
        )));
    };
    if !ve_base.exists() {
        std::fs::create_dir_all(ve_base).map_err(|e| VexError::io("creating", ve_base, e))?;
    } else if !ve_base.is_dir() {
        return Err(VexError::VirtualenvNotMade(format!(
            "could not make virtualenv: {} already exists but is not a directory. \
             Choose a different virtualenvs path using ~/.vexrc or $WORKON_HOME, \
             or remove the existing file; then rerun your vex --make command.",
            quoted(ve_base)
        )));
    }

    let args = options.virtualenv_args(make_path);
    tracing::debug!("Making virtualenv {}", quoted(make_path));
    match exec::launch(&args, environ, Some(ve_base), platform)? {
        Launch::Exited(0) => {}
        Launch::Exited(code) => {
            return Err(VexError::VirtualenvNotMade(format!(
                "error creating virtualenv (exit {code})"
            )));
        }
        Launch::NotFound => {
            return Err(VexError::VirtualenvNotMade(
                "error creating virtualenv: virtualenv not found on PATH".to_string(),
            ));
        }
    }

    write_pydoc(make_path, platform)
}

fn write_pydoc(make_path: &Path, platform: Platform) -> Result<()> {
    let scripts = make_path.join(platform.scripts_dir());
    let (path, contents) = if platform.is_windows() {
        (scripts.join("pydoc.bat"), PYDOC_BATCH)
    } else {
        (scripts.join("pydoc"), PYDOC_SCRIPT)
    };
    std::fs::write(&path, contents).map_err(|e| VexError::io("writing", &path, e))?;
    make_executable(&path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)
        .map_err(|e| VexError::io("reading", path, e))?
        .permissions();
    perms.set_mode(perms.mode() | 0o111);
    std::fs::set_permissions(path, perms).map_err(|e| VexError::io("chmod", path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
