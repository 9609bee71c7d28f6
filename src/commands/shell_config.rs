//! Command: print shell completion setup.
use std::io::Write;

use anyhow::Result;

use crate::config::{Vexrc, get_ve_base};
use crate::environ::Environ;
use crate::platform::Platform;
use crate::shell_config::{Shell, shell_config_for};

/// Write the completion setup for the shell named `shell` to `out`.
///
/// # Errors
///
/// Returns an error for a shell without a template, or if writing fails.
pub fn run(
    shell: &str,
    vexrc: &Vexrc,
    environ: &Environ,
    platform: Platform,
    out: &mut impl Write,
) -> Result<()> {
    let shell: Shell = shell.parse()?;
    let ve_base = get_ve_base(vexrc, environ, platform);
    out.write_all(shell_config_for(shell, ve_base.as_deref()).as_bytes())?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, VexError};

    #[test]
    fn base_directory_need_not_exist() {
        let mut env = Environ::new();
        env.insert("WORKON_HOME".to_string(), "/nowhere/envs".to_string());
        let mut out = Vec::new();
        run("bash", &Vexrc::default(), &env, Platform::detect(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("/nowhere/envs"));
        assert!(text.contains("complete"));
    }

    #[test]
    fn unknown_shell() {
        let mut out = Vec::new();
        let err = run("tcsh", &Vexrc::default(), &Environ::new(), Platform::detect(), &mut out)
            .unwrap_err();
        let err = err.downcast::<VexError>().unwrap();
        assert_eq!(err.kind(), ErrorKind::OtherShell);
        assert!(out.is_empty());
    }
}
