//! Top-level actions, one module per mode of the command line.
pub mod list;
pub mod run;
pub mod shell_config;
pub mod version;

use anyhow::Result;

use crate::cli::Cli;
use crate::config;
use crate::environ::Environ;
use crate::platform::Platform;

/// Load the config, then hand off to the action the flags ask for.
///
/// `--shell-config`, `--list` and `--version` print to stdout and finish
/// before anything about a virtualenv is resolved. Returns the exit code.
///
/// # Errors
///
/// Returns any error from loading the config or from the chosen action.
pub fn dispatch(cli: Cli, environ: &Environ, platform: Platform) -> Result<i32> {
    let loaded = config::load(cli.config.as_deref(), environ, platform)?;
    let vexrc = &loaded.vexrc;

    if let Some(shell) = &cli.shell_config {
        shell_config::run(shell, vexrc, environ, platform, &mut std::io::stdout().lock())?;
        return Ok(0);
    }
    if let Some(prefix) = &cli.list {
        list::run(prefix, vexrc, environ, platform, &mut std::io::stdout().lock())?;
        return Ok(0);
    }
    if cli.version {
        version::run(&mut std::io::stdout().lock())?;
        return Ok(0);
    }

    run::run(cli, vexrc, environ, platform)
}
