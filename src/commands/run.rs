//! Command: run a command inside a virtualenv.
//!
//! Everything that can fail without side effects is checked before
//! `--make` creates anything, so a bad invocation never leaves an unused
//! virtualenv behind.
use std::path::Path;

use anyhow::Result;

use crate::activate::get_environ;
use crate::cli::Cli;
use crate::config::{Vexrc, get_ve_base};
use crate::environ::Environ;
use crate::error::{VexError, quoted};
use crate::exec::{self, Launch};
use crate::make::handle_make;
use crate::platform::Platform;
use crate::remove::{RemoveGuard, handle_remove};
use crate::resolve::{self, ResolvedTarget};

/// Resolve the target virtualenv, launch the command in it and return the
/// exit code vex should report.
///
/// # Errors
///
/// Returns an error if any resolution step fails, if `--make` or
/// `--remove` fails, or if the command does not exist.
pub fn run(cli: Cli, vexrc: &Vexrc, environ: &Environ, platform: Platform) -> Result<i32> {
    let cwd = resolve::get_cwd(cli.cwd.as_deref())?;
    let ve_base = get_ve_base(vexrc, environ, platform);

    let mut rest = cli.rest.clone();
    let name = match &cli.path {
        Some(_) => None,
        None => Some(resolve::take_virtualenv_name(&mut rest)?),
    };
    let command = resolve::get_command(rest, vexrc, environ)?;

    if let Some(base) = &ve_base {
        tracing::debug!("Dir with virtualenvs: {}", base.display());
    }
    if let Some(name) = &name {
        tracing::debug!("Name of virtualenv: {name}");
    }
    tracing::debug!("Command to run: {command:?}");

    let target = resolve_target(&cli, ve_base.as_deref(), name.as_deref(), vexrc, environ, platform)?;
    tracing::debug!("Using virtualenv {} at {}", target.name, target.path.display());

    let env = get_environ(environ, vexrc.env(), &target.path, platform)?;
    let launched = exec::launch(&command, &env, cwd.as_deref(), platform)?;

    if cli.remove {
        handle_remove(&target.path, &RemoveGuard::from_environ(environ, platform))?;
    }

    match launched {
        Launch::Exited(code) => Ok(code),
        Launch::NotFound => {
            let program = command.first().map_or("", String::as_str);
            Err(VexError::InvalidCommand(format!("command not found: '{program}'")).into())
        }
    }
}

/// Pick the virtualenv: make it, take it from `--path`, or look it up by
/// name under the virtualenvs directory.
fn resolve_target(
    cli: &Cli,
    ve_base: Option<&Path>,
    name: Option<&str>,
    vexrc: &Vexrc,
    environ: &Environ,
    platform: Platform,
) -> Result<ResolvedTarget> {
    if cli.make {
        let make_path = match (&cli.path, ve_base, name) {
            (Some(path), _, _) => resolve::absolutize(path)?,
            (None, Some(base), Some(name)) => resolve::absolutize(&base.join(name))?,
            (None, None, _) => {
                return Err(VexError::NoVirtualenvsDirectory(
                    "could not figure out where to make the virtualenv. \
                     make sure $HOME is set, or $WORKON_HOME, \
                     or set virtualenvs=something in your .vexrc"
                        .to_string(),
                )
                .into());
            }
            (None, Some(_), None) => {
                return Err(VexError::NoVirtualenvName(
                    "could not find a virtualenv name in the command line.".to_string(),
                )
                .into());
            }
        };
        handle_make(&make_path, &cli.make_options(vexrc.python()), environ, platform)?;
        return Ok(ResolvedTarget::from_path(make_path));
    }

    if let Some(path) = &cli.path {
        let path = resolve::get_explicit_path(path)?;
        tracing::debug!("Using --path {}", quoted(&path));
        return Ok(ResolvedTarget::from_path(path));
    }

    let name = name.unwrap_or_default();
    let path = resolve::get_virtualenv_path(ve_base, name)?;
    Ok(ResolvedTarget {
        path,
        name: name.to_string(),
    })
}
