//! Command intents and the runner abstraction that executes them.
//!
//! A [`SyncCommand`] describes one invocation of the host tool: a working
//! directory, an argument vector, and optionally a replacement environment.
//! It carries no result until a [`CommandRunner`] executes it.
//!
//! The runner abstraction enables test doubles that report pre-configured
//! outcomes without spawning real processes.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::environment::Environment;
use crate::error::SyncError;

/// Tracing target for command sequencing.
const RUNNER_TARGET: &str = "ypm_sync::runner";

/// Binary outcome of a host-tool invocation or of a whole command sequence.
///
/// Any non-zero child status collapses to [`ExitCode::Failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitCode {
    /// Every command completed with a zero status.
    Success,
    /// A command exited unsuccessfully.
    Failure,
}

impl ExitCode {
    /// Returns true for [`ExitCode::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns the process status this outcome is reported as: `0` or `1`.
    #[must_use]
    pub const fn as_status(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }
}

/// An intent to invoke the host tool.
///
/// # Example
///
/// ```
/// use ypm_sync::SyncCommand;
///
/// let command = SyncCommand::new("/work/app", ["plugin", "remove", "foo"]);
/// assert_eq!(command.arguments().len(), 3);
/// assert!(command.environment().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncCommand {
    working_directory: PathBuf,
    arguments: Vec<OsString>,
    environment: Option<Environment>,
}

impl SyncCommand {
    /// Creates a command that inherits the ambient environment.
    #[must_use]
    pub fn new<I, S>(working_directory: impl Into<PathBuf>, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            working_directory: working_directory.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
            environment: None,
        }
    }

    /// Replaces the environment the command runs with.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Directory the command runs in.
    #[must_use]
    pub fn working_directory(&self) -> &Path {
        self.working_directory.as_path()
    }

    /// Arguments passed to the host tool.
    #[must_use]
    pub fn arguments(&self) -> &[OsString] {
        &self.arguments
    }

    /// Replacement environment, or `None` to inherit the ambient one.
    #[must_use]
    pub const fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    /// Renders the argument vector for log output.
    pub(crate) fn display_arguments(&self) -> String {
        self.arguments
            .iter()
            .map(|argument| argument.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Trait abstracting host-tool execution for testability.
///
/// The production implementation is [`YarnRunner`](crate::process::YarnRunner),
/// which spawns a child process with inherited standard streams. Test code
/// can implement this trait to script outcomes.
///
/// # Example
///
/// ```
/// use ypm_sync::{CommandRunner, ExitCode, SyncCommand, SyncError};
///
/// struct AlwaysSucceeds;
///
/// impl CommandRunner for AlwaysSucceeds {
///     fn run(&self, _command: &SyncCommand) -> Result<ExitCode, SyncError> {
///         Ok(ExitCode::Success)
///     }
/// }
/// ```
pub trait CommandRunner {
    /// Executes one command and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] when the command cannot be started at all.
    /// An unsuccessful exit is reported as [`ExitCode::Failure`], not as an
    /// error.
    fn run(&self, command: &SyncCommand) -> Result<ExitCode, SyncError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &SyncCommand) -> Result<ExitCode, SyncError> {
        (**self).run(command)
    }
}

/// Runs commands strictly in order, stopping at the first failure.
///
/// Returns [`ExitCode::Success`] when every command succeeded, including
/// when `commands` is empty.
///
/// # Errors
///
/// Propagates the first [`SyncError`] reported by the runner; later commands
/// are not run.
pub fn run_sequence<R>(runner: &R, commands: &[SyncCommand]) -> Result<ExitCode, SyncError>
where
    R: CommandRunner + ?Sized,
{
    for (index, command) in commands.iter().enumerate() {
        info!(
            target: RUNNER_TARGET,
            step = index + 1,
            total = commands.len(),
            cwd = %command.working_directory().display(),
            arguments = %command.display_arguments(),
            "running host command"
        );
        if runner.run(command)? == ExitCode::Failure {
            warn!(
                target: RUNNER_TARGET,
                arguments = %command.display_arguments(),
                skipped = commands.len() - index - 1,
                "host command failed, stopping sequence"
            );
            return Ok(ExitCode::Failure);
        }
    }
    Ok(ExitCode::Success)
}
