//! `.vexrc` loading: the parser, placeholder expansion, and the lookups
//! built on top of the parsed file.
pub mod interpolate;
pub mod ve_base;
pub mod vexrc;

use std::path::{Path, PathBuf};

use crate::environ::{self, Environ};
use crate::error::{Result, VexError, quoted};
use crate::platform::Platform;

pub use ve_base::get_ve_base;
pub use vexrc::{ConfigSource, Heading, Vexrc};

/// Config file used when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "~/.vexrc";

/// The config in effect for one invocation.
#[derive(Debug, Clone)]
pub struct Loaded {
    /// File that was read, if one existed.
    pub path: Option<PathBuf>,
    /// Parsed contents, or the empty defaults.
    pub vexrc: Vexrc,
}

/// Load the config named by `--config`, or `~/.vexrc`.
///
/// An explicitly named file has to exist; the default one does not.
///
/// # Errors
///
/// Returns [`VexError::InvalidVexrc`] for a nonexistent `--config` file and
/// any error from [`vexrc::read`].
pub fn load(explicit: Option<&Path>, environ: &Environ, platform: Platform) -> Result<Loaded> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(VexError::InvalidVexrc(format!(
                "nonexistent config: {}",
                quoted(path)
            )));
        }
        Some(path) => path.to_path_buf(),
        None => environ::expand_user(DEFAULT_CONFIG, environ, platform),
    };

    match vexrc::read(&path, environ)? {
        ConfigSource::Found(vexrc) => {
            tracing::debug!("Using config {}", path.display());
            Ok(Loaded {
                path: Some(path),
                vexrc,
            })
        }
        ConfigSource::NotFound => Ok(Loaded {
            path: None,
            vexrc: Vexrc::default(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::platform::Os;

    const POSIX: Platform = Platform::new(Os::Posix);

    #[test]
    fn explicit_missing_config_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = load(Some(&missing), &Environ::new(), POSIX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidVexrc);
        assert!(err.to_string().contains("nonexistent config"));
    }

    #[test]
    fn missing_default_config_is_fine() {
        let home = tempfile::tempdir().unwrap();
        let mut env = Environ::new();
        env.insert("HOME".to_string(), home.path().display().to_string());
        let loaded = load(None, &env, POSIX).unwrap();
        assert!(loaded.path.is_none());
        assert_eq!(loaded.vexrc, Vexrc::default());
    }

    #[test]
    fn default_config_is_read_from_home() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join(".vexrc"), "virtualenvs=/somewhere\n").unwrap();
        let mut env = Environ::new();
        env.insert("HOME".to_string(), home.path().display().to_string());
        let loaded = load(None, &env, POSIX).unwrap();
        assert_eq!(loaded.path, Some(home.path().join(".vexrc")));
        assert_eq!(loaded.vexrc.root().get("virtualenvs"), Some("/somewhere"));
    }

    #[test]
    fn explicit_config_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom");
        std::fs::write(&path, "env:\nX=\"{Y}\"\n").unwrap();
        let mut env = Environ::new();
        env.insert("Y".to_string(), "z".to_string());
        let loaded = load(Some(&path), &env, POSIX).unwrap();
        assert_eq!(loaded.vexrc.env().get("X"), Some("z"));
    }
}
