//! Shell completion setup printed by `--shell-config`.
//!
//! Each template refers to the virtualenvs directory as `$WORKON_HOME`. When
//! the resolved directory is a plain, unsurprising path it is written into
//! the output directly, since the user's shell will evaluate what we print.
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::VexError;

/// Token in each template that stands for the virtualenvs directory.
pub const PLACEHOLDER: &str = "$WORKON_HOME";

const BASH: &str = include_str!("shell_configs/bash");
const ZSH: &str = include_str!("shell_configs/zsh");
const FISH: &str = include_str!("shell_configs/fish");

/// A shell with a completion template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    /// GNU bash.
    Bash,
    /// Z shell.
    Zsh,
    /// fish.
    Fish,
}

impl Shell {
    /// The raw template, placeholder included.
    #[must_use]
    pub const fn template(self) -> &'static str {
        match self {
            Self::Bash => BASH,
            Self::Zsh => ZSH,
            Self::Fish => FISH,
        }
    }
}

impl FromStr for Shell {
    type Err = VexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(Self::Bash),
            "zsh" => Ok(Self::Zsh),
            "fish" => Ok(Self::Fish),
            other => Err(VexError::OtherShell(format!(
                "unknown shell: {other:?} (expected bash, zsh or fish)"
            ))),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bash => write!(f, "bash"),
            Self::Zsh => write!(f, "zsh"),
            Self::Fish => write!(f, "fish"),
        }
    }
}

/// Whether `path` could do something unexpected when pasted into a shell
/// script.
///
/// Only ASCII letters, digits, space and `/ . _ - ,` are allowed. Empty
/// paths, paths starting with `-` and paths made only of `/` are scary too.
#[must_use]
pub fn is_scary_path(path: &str) -> bool {
    if path.is_empty() || path.starts_with('-') || path.chars().all(|c| c == '/') {
        return true;
    }
    !path
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | ',' | ' '))
}

/// Render the completion setup for `shell`.
///
/// `$WORKON_HOME` is replaced with `ve_base` when the directory is known and
/// not scary; otherwise the template is returned unchanged and the shell
/// reads the variable at completion time.
#[must_use]
pub fn shell_config_for(shell: Shell, ve_base: Option<&Path>) -> String {
    let template = shell.template();
    let Some(base) = ve_base.and_then(Path::to_str) else {
        return template.to_string();
    };
    if is_scary_path(base) {
        tracing::debug!("not substituting virtualenvs directory {base:?} into {shell} config");
        return template.to_string();
    }
    template.replace(PLACEHOLDER, base)
}
