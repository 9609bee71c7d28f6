//! Command-line arguments.
use std::path::PathBuf;

use clap::Parser;

use crate::error::VexError;
use crate::make::MakeOptions;

/// Run a command in the named virtualenv.
///
/// Everything after the virtualenv name is passed to the command untouched,
/// so options for vex itself have to come first.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "vex", about = "Run a command in the named virtualenv")]
pub struct Cli {
    /// Make the named virtualenv before running the command
    #[arg(short = 'm', long)]
    pub make: bool,

    /// Python to use for the virtualenv made by --make
    #[arg(long, value_name = "PYTHON")]
    pub python: Option<String>,

    /// Give the virtualenv made by --make access to the global site-packages
    #[arg(long)]
    pub site_packages: bool,

    /// Copy files instead of symlinking when using --make
    #[arg(long)]
    pub always_copy: bool,

    /// Do not install wheel when using --make
    #[arg(long)]
    pub no_wheel: bool,

    /// Remove the virtualenv after the command exits
    #[arg(short = 'r', long)]
    pub remove: bool,

    /// Use the virtualenv at this path instead of looking it up by name
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Run the command in this directory
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Read this config file instead of ~/.vexrc
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print completion setup for bash, zsh or fish
    #[arg(long, value_name = "SHELL")]
    pub shell_config: Option<String>,

    /// List virtualenvs, optionally only those starting with PREFIX
    #[arg(long, value_name = "PREFIX", num_args = 0..=1, default_missing_value = "")]
    pub list: Option<String>,

    /// Print the version of vex
    #[arg(long)]
    pub version: bool,

    /// Show what vex is doing
    #[arg(short, long)]
    pub verbose: bool,

    /// Virtualenv name followed by the command to run
    #[arg(
        value_name = "NAME COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub rest: Vec<String>,
}

impl Cli {
    /// `virtualenv` options for `--make`, falling back to `default_python`
    /// when `--python` was not given.
    #[must_use]
    pub fn make_options(&self, default_python: Option<&str>) -> MakeOptions {
        MakeOptions {
            python: self
                .python
                .clone()
                .or_else(|| default_python.map(str::to_string)),
            site_packages: self.site_packages,
            always_copy: self.always_copy,
            no_wheel: self.no_wheel,
        }
    }
}

/// Turn a clap usage error into [`VexError::UnknownArguments`], keeping
/// only the first line of clap's message.
#[must_use]
pub fn usage_error(err: &clap::Error) -> VexError {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    VexError::UnknownArguments(first.trim_start_matches("error: ").to_string())
}
