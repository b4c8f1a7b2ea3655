//! Process-based command execution.
//!
//! [`YarnRunner`] implements the [`CommandRunner`] trait by spawning the host
//! tool as a child process. The child shares this process's standard
//! streams, so Yarn's own progress output reaches the user directly, and the
//! runner blocks until it exits. There is no timeout.

use std::ffi::{OsStr, OsString};
use std::process::{Command, Stdio};
use std::sync::Arc;

use tracing::debug;

use crate::error::SyncError;
use crate::runner::{CommandRunner, ExitCode, SyncCommand};

/// Tracing target for host-tool process operations.
const PROCESS_TARGET: &str = "ypm_sync::process";

/// Executable used when none is configured, resolved through `PATH`.
pub const DEFAULT_YARN_EXECUTABLE: &str = "yarn";

/// Executes commands by spawning the Yarn executable.
///
/// # Example
///
/// ```rust,no_run
/// use ypm_sync::{CommandRunner, SyncCommand, YarnRunner};
///
/// let runner = YarnRunner::new("/usr/local/bin/yarn");
/// let command = SyncCommand::new("/work/app", ["plugin", "runtime"]);
/// let outcome = runner.run(&command).expect("yarn starts");
/// println!("{outcome:?}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YarnRunner {
    executable: OsString,
}

impl YarnRunner {
    /// Creates a runner that spawns `executable`.
    #[must_use]
    pub fn new(executable: impl Into<OsString>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// The executable this runner spawns.
    #[must_use]
    pub fn executable(&self) -> &OsStr {
        self.executable.as_os_str()
    }
}

impl Default for YarnRunner {
    fn default() -> Self {
        Self::new(DEFAULT_YARN_EXECUTABLE)
    }
}

impl CommandRunner for YarnRunner {
    fn run(&self, command: &SyncCommand) -> Result<ExitCode, SyncError> {
        let mut child = Command::new(&self.executable);
        child
            .args(command.arguments())
            .current_dir(command.working_directory())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(environment) = command.environment() {
            child.env_clear().envs(environment);
        }

        debug!(
            target: PROCESS_TARGET,
            executable = %self.executable.to_string_lossy(),
            cwd = %command.working_directory().display(),
            "spawning host tool"
        );

        let status = child.status().map_err(|source| SyncError::Spawn {
            program: self.executable.to_string_lossy().into_owned(),
            source: Arc::new(source),
        })?;

        debug!(target: PROCESS_TARGET, ?status, "host tool exited");
        Ok(if status.success() {
            ExitCode::Success
        } else {
            ExitCode::Failure
        })
    }
}
