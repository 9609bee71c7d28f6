//! Command: print version information.
use std::io::Write;

use anyhow::Result;

/// Write the vex version to `out`.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn run(out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
