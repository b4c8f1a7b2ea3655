//! Entry point for the `yarn-plugin-manager` binary.
//!
//! The binary delegates to [`ypm_cli::run`], which forwards its arguments to
//! Yarn inside the isolated plugin workspace and then synchronizes the
//! project's imported plugins.

use std::io::{self, StderrLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    ypm_cli::run(std::env::args_os(), &mut stderr)
}
