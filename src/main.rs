//! `vex` entry point.
use clap::Parser;

use vex::cli::{self, Cli};
use vex::environ;
use vex::logging;
use vex::platform::Platform;

fn main() {
    let _ = enable_ansi_support::enable_ansi_support();

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => std::process::exit(report(&cli::usage_error(&err).into())),
    };

    let environ = environ::from_process();
    logging::init_subscriber(args.verbose, environ.get(logging::LOG_ENV).map(String::as_str));

    let code = match vex::commands::dispatch(args, &environ, Platform::detect()) {
        Ok(code) => code,
        Err(err) => report(&err),
    };
    std::process::exit(code);
}

/// Print `err` on stderr and return the exit code for a failed run.
#[allow(clippy::print_stderr)]
fn report(err: &anyhow::Error) -> i32 {
    eprintln!("Error: {err}");
    1
}
