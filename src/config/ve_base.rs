//! Locating the virtualenvs directory.
use std::path::PathBuf;

use super::vexrc::Vexrc;
use crate::environ::{self, Environ, WORKON_HOME};
use crate::platform::Platform;

/// Find the directory that holds named virtualenvs.
///
/// Precedence:
/// 1. `virtualenvs=` in the config file, with `~` expanded
/// 2. `$WORKON_HOME`
/// 3. `<home>/.virtualenvs`
///
/// Returns `None` only when none of these yields a value. Existence is not
/// checked here, so callers can report a missing directory by name.
#[must_use]
pub fn get_ve_base(vexrc: &Vexrc, environ: &Environ, platform: Platform) -> Option<PathBuf> {
    if let Some(value) = vexrc.root().get_non_empty("virtualenvs") {
        return Some(environ::expand_user(value, environ, platform));
    }
    if let Some(value) = environ::non_empty(environ, WORKON_HOME) {
        return Some(PathBuf::from(value));
    }
    environ::home_dir(environ, platform).map(|home| home.join(".virtualenvs"))
}
