//! Command-line runtime for the Yarn plugin manager.
//!
//! The runtime loads configuration, installs telemetry, locates the project
//! enclosing the working directory, and proxies its arguments to Yarn inside
//! the isolated plugin workspace before synchronizing imported plugins. It
//! can be driven from the binary or from tests, where the configuration
//! loader, the working directory and the error stream are substituted.

use std::env;
use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use tracing::debug;
use ypm_config::Config;
use ypm_sync::{ProjectLayout, Synchronizer, YarnRunner, find_project_root};

mod config;
mod errors;
mod telemetry;

use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;

/// Tracing target for the CLI runtime.
const CLI_TARGET: &str = "ypm_cli";

/// Runs the CLI with the provided arguments, reporting errors on `stderr`.
///
/// The first argument is the program name; every later argument is passed
/// to Yarn unchanged. Returns status `0` when the proxied command and the
/// following synchronization succeed, `1` otherwise.
#[must_use]
pub fn run<I, E>(args: I, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    E: Write,
{
    let arguments: Vec<OsString> = args.into_iter().collect();
    let outcome = env::current_dir()
        .map_err(AppError::CurrentDir)
        .and_then(|cwd| execute(&arguments, &OrthoConfigLoader, &cwd));
    report(outcome, stderr)
}

fn execute(
    args: &[OsString],
    loader: &dyn ConfigLoader,
    cwd: &Path,
) -> Result<ypm_sync::ExitCode, AppError> {
    let config = loader.load(args)?;
    telemetry::initialise(&config)?;

    let root = find_project_root(cwd)?;
    debug!(target: CLI_TARGET, root = %root.display(), "resolved project");
    let layout = ProjectLayout::new(root);

    let forwarded = args.iter().skip(1).cloned();
    synchronizer(&config)
        .proxy(&layout, forwarded)
        .map_err(AppError::from)
}

fn synchronizer(config: &Config) -> Synchronizer<YarnRunner> {
    Synchronizer::new(YarnRunner::new(config.yarn_path()))
        .with_policy(config.hash_match_policy())
}

fn report<E: Write>(outcome: Result<ypm_sync::ExitCode, AppError>, stderr: &mut E) -> ExitCode {
    match outcome {
        Ok(code) => ExitCode::from(code.as_status()),
        Err(error) => {
            let _ = writeln!(stderr, "yarn-plugin-manager: {error}");
            ExitCode::FAILURE
        }
    }
}
