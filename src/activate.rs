//! Building the environment a command sees inside a virtualenv.
//!
//! This replaces sourcing an `activate` script: the parent environment is
//! copied, the `[env]` overrides from the config are laid over it, and `PATH`
//! and `VIRTUAL_ENV` are rewritten to point at the target virtualenv. The
//! parent map is never modified.
use std::path::Path;

use crate::config::Heading;
use crate::environ::{self, Environ, PATH, PYTHONHOME, VIRTUAL_ENV};
use crate::error::{Result, VexError, quoted};
use crate::platform::Platform;

/// Compute the child environment for running in `ve_path`.
///
/// - `defaults` entries overwrite same-named variables.
/// - `PYTHONHOME` is removed.
/// - The scripts directory of a previously active virtualenv is taken off
///   `PATH`, and this virtualenv's scripts directory is put first.
/// - `VIRTUAL_ENV` is set to `ve_path`.
///
/// Empty `PATH` entries are dropped and the rest are normalized.
///
/// # Errors
///
/// Returns [`VexError::BadConfig`] when `ve_path` is empty, has no scripts
/// directory, or when `VIRTUAL_ENV` names a virtualenv whose scripts
/// directory is not on `PATH`.
pub fn get_environ(
    environ: &Environ,
    defaults: &Heading,
    ve_path: &Path,
    platform: Platform,
) -> Result<Environ> {
    let mut env = environ.clone();
    for (key, value) in defaults.iter() {
        env.insert(key.to_string(), value.to_string());
    }
    env.remove(PYTHONHOME);

    if ve_path.as_os_str().is_empty() {
        return Err(VexError::BadConfig("ve_path must be set".to_string()));
    }

    let ve_bin = ve_path.join(platform.scripts_dir());
    if !ve_bin.exists() {
        return Err(VexError::BadConfig(format!(
            "could not find scripts directory {}",
            quoted(&ve_bin)
        )));
    }
    let ve_bin = ve_bin.display().to_string();

    let separator = platform.path_list_separator();
    let mut segments: Vec<String> = env
        .get(PATH)
        .map(|path| {
            path.split(separator)
                .filter(|segment| !segment.is_empty())
                .map(|segment| platform.normalize(segment))
                .collect()
        })
        .unwrap_or_default();

    if let Some(old_ve) = environ::non_empty(&env, VIRTUAL_ENV) {
        let old_bin = platform.normalize(&format!(
            "{old_ve}{}{}",
            platform.path_separator(),
            platform.scripts_dir()
        ));
        let Some(index) = segments.iter().position(|s| *s == old_bin) else {
            return Err(VexError::BadConfig(format!(
                "inconsistent VIRTUAL_ENV: {old_bin} is not in PATH"
            )));
        };
        segments.remove(index);
    }

    segments.insert(0, ve_bin);
    let joined = segments.join(&separator.to_string());
    tracing::debug!("PATH={joined}");
    env.insert(PATH.to_string(), joined);
    env.insert(VIRTUAL_ENV.to_string(), ve_path.display().to_string());
    Ok(env)
}
