//! Error taxonomy for vex.
//!
//! Every failure on the way from command line to launched process is a
//! [`VexError`]. Each variant is one *kind* of invalid argument or state and
//! carries the human-readable message shown to the user. Command handlers at
//! the CLI boundary convert these into [`anyhow::Error`] via `?`, and `main`
//! renders them as a single `Error: <message>` line.
//!
//! # Kinds
//!
//! ```text
//! VexError
//! ├── NoVirtualenvName        no name or path on the command line
//! ├── NoVirtualenvsDirectory  base directory unknown or missing
//! ├── InvalidVirtualenv       named/explicit environment is unusable
//! ├── InvalidVexrc            config file missing or unreadable
//! ├── ConfigSyntax            one or more unparseable config lines
//! ├── InvalidCommand          nothing runnable
//! ├── InvalidCwd              --cwd does not exist
//! ├── BadConfig               activation invariants do not hold
//! ├── VirtualenvAlreadyMade   --make target exists
//! ├── VirtualenvNotMade       provisioning failed
//! ├── VirtualenvNotRemoved    removal guard refused
//! ├── UnknownArguments        unrecognised flags
//! ├── OtherShell              no completion template for shell
//! └── Io                      unexpected I/O failure
//! ```

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// The kind of a [`VexError`], without its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`VexError::NoVirtualenvName`].
    NoVirtualenvName,
    /// See [`VexError::NoVirtualenvsDirectory`].
    NoVirtualenvsDirectory,
    /// See [`VexError::InvalidVirtualenv`].
    InvalidVirtualenv,
    /// See [`VexError::InvalidVexrc`].
    InvalidVexrc,
    /// See [`VexError::ConfigSyntax`].
    ConfigSyntax,
    /// See [`VexError::InvalidCommand`].
    InvalidCommand,
    /// See [`VexError::InvalidCwd`].
    InvalidCwd,
    /// See [`VexError::BadConfig`].
    BadConfig,
    /// See [`VexError::VirtualenvAlreadyMade`].
    VirtualenvAlreadyMade,
    /// See [`VexError::VirtualenvNotMade`].
    VirtualenvNotMade,
    /// See [`VexError::VirtualenvNotRemoved`].
    VirtualenvNotRemoved,
    /// See [`VexError::UnknownArguments`].
    UnknownArguments,
    /// See [`VexError::OtherShell`].
    OtherShell,
    /// See [`VexError::Io`].
    Io,
}

/// All failures raised by vex.
#[derive(Error, Debug)]
pub enum VexError {
    /// No virtualenv name was given (insufficient arguments).
    #[error("{0}")]
    NoVirtualenvName(String),

    /// There is no directory to find named virtualenvs in.
    #[error("{0}")]
    NoVirtualenvsDirectory(String),

    /// No usable virtualenv was found.
    #[error("{0}")]
    InvalidVirtualenv(String),

    /// Config file specified or required but absent or unparseable.
    #[error("{0}")]
    InvalidVexrc(String),

    /// The config file contains lines matching neither grammar rule.
    #[error("errors in '{file}', lines {lines:?}")]
    ConfigSyntax {
        /// Name of the file that failed to parse.
        file: String,
        /// Sorted 0-based numbers of every offending line.
        lines: Vec<usize>,
    },

    /// No runnable command was found.
    #[error("{0}")]
    InvalidCommand(String),

    /// Working directory specified but unusable.
    #[error("{0}")]
    InvalidCwd(String),

    /// A fatal condition on the way to running the command.
    #[error("{0}")]
    BadConfig(String),

    /// Could not make a virtualenv because one already exists.
    #[error("{0}")]
    VirtualenvAlreadyMade(String),

    /// Could not make a virtualenv.
    #[error("{0}")]
    VirtualenvNotMade(String),

    /// The removal guard refused to delete a directory.
    #[error("{0}")]
    VirtualenvNotRemoved(String),

    /// Unknown arguments were given on the command line.
    #[error("{0}")]
    UnknownArguments(String),

    /// The argument to `--shell-config` is not a supported shell.
    #[error("{0}")]
    OtherShell(String),

    /// An I/O operation failed unexpectedly.
    #[error("{context}: {source}")]
    Io {
        /// What vex was doing when the failure happened.
        context: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl VexError {
    /// Return the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoVirtualenvName(_) => ErrorKind::NoVirtualenvName,
            Self::NoVirtualenvsDirectory(_) => ErrorKind::NoVirtualenvsDirectory,
            Self::InvalidVirtualenv(_) => ErrorKind::InvalidVirtualenv,
            Self::InvalidVexrc(_) => ErrorKind::InvalidVexrc,
            Self::ConfigSyntax { .. } => ErrorKind::ConfigSyntax,
            Self::InvalidCommand(_) => ErrorKind::InvalidCommand,
            Self::InvalidCwd(_) => ErrorKind::InvalidCwd,
            Self::BadConfig(_) => ErrorKind::BadConfig,
            Self::VirtualenvAlreadyMade(_) => ErrorKind::VirtualenvAlreadyMade,
            Self::VirtualenvNotMade(_) => ErrorKind::VirtualenvNotMade,
            Self::VirtualenvNotRemoved(_) => ErrorKind::VirtualenvNotRemoved,
            Self::UnknownArguments(_) => ErrorKind::UnknownArguments,
            Self::OtherShell(_) => ErrorKind::OtherShell,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Build an [`VexError::Io`] whose context mentions `path`.
    pub fn io(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            context: format!("{action} {}", quoted(path)),
            source,
        }
    }
}

/// Convenience alias used by the core modules.
pub type Result<T, E = VexError> = std::result::Result<T, E>;

/// Render a path the way messages quote it: `'/some/path'`.
#[must_use]
pub fn quoted(path: &Path) -> Quoted<'_> {
    Quoted(path)
}

/// Display adapter returned by [`quoted`].
#[derive(Debug, Clone, Copy)]
pub struct Quoted<'a>(&'a Path);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0.display())
    }
}
