//! Orchestration of synchronization passes and proxied commands.
//!
//! [`Synchronizer`] owns a [`CommandRunner`] and the policy knobs of a pass.
//! It holds no state between calls: every pass reads the workspace manifest
//! and the host configuration afresh.

use std::ffi::OsString;

use tracing::{debug, info};

use crate::diff::{HashMatchPolicy, compute_additions, compute_removals};
use crate::environment::{Environment, YARN_OVERRIDE_VARIABLES, sanitize};
use crate::error::SyncError;
use crate::host_config::{YarnrcStore, read_installed_plugins};
use crate::layout::ProjectLayout;
use crate::manifest::read_declared_dependencies;
use crate::record::PluginRecord;
use crate::runner::{CommandRunner, ExitCode, SyncCommand, run_sequence};
use crate::skeleton::ensure_skeleton;

/// Tracing target for orchestration.
const SYNC_TARGET: &str = "ypm_sync::sync";

/// Runs synchronization passes through a [`CommandRunner`].
///
/// # Example
///
/// ```
/// use ypm_sync::{CommandRunner, ExitCode, HashMatchPolicy, SyncCommand, SyncError, Synchronizer};
///
/// struct AlwaysSucceeds;
///
/// impl CommandRunner for AlwaysSucceeds {
///     fn run(&self, _command: &SyncCommand) -> Result<ExitCode, SyncError> {
///         Ok(ExitCode::Success)
///     }
/// }
///
/// let synchronizer =
///     Synchronizer::new(AlwaysSucceeds).with_policy(HashMatchPolicy::SkipPlugin);
/// assert_eq!(synchronizer.policy(), HashMatchPolicy::SkipPlugin);
/// ```
#[derive(Debug)]
pub struct Synchronizer<R> {
    runner: R,
    policy: HashMatchPolicy,
    environment: Environment,
}

impl<R: CommandRunner> Synchronizer<R> {
    /// Creates a synchronizer over `runner`, using the default policy and a
    /// snapshot of the current process environment.
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            policy: HashMatchPolicy::default(),
            environment: Environment::capture(),
        }
    }

    /// Sets what the addition pass does with up-to-date plugins.
    #[must_use]
    pub const fn with_policy(mut self, policy: HashMatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the baseline environment proxied commands are derived from.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// The runner commands are executed through.
    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// The configured hash-match policy.
    #[must_use]
    pub const fn policy(&self) -> HashMatchPolicy {
        self.policy
    }

    /// Brings the project's imported plugins in line with the workspace's
    /// declared dependencies.
    ///
    /// Removals run first. When one fails, additions are not attempted.
    /// Additions are computed only after removals have run, so they see the
    /// imported bundles as removals left them.
    ///
    /// # Errors
    ///
    /// Propagates any [`SyncError`] from reading state, computing the diff,
    /// or starting a command.
    pub fn sync(&self, layout: &ProjectLayout) -> Result<ExitCode, SyncError> {
        let declared = read_declared_dependencies(layout.workspace_dir())?;
        let store = YarnrcStore::new(layout.host_config_path());
        let installed: Vec<PluginRecord> = read_installed_plugins(&store)?
            .into_iter()
            .map(PluginRecord::parse)
            .collect();

        let removals = compute_removals(layout, &installed, &declared);
        debug!(
            target: SYNC_TARGET,
            declared = declared.len(),
            installed = installed.len(),
            removals = removals.len(),
            "computed removals"
        );
        if run_sequence(&self.runner, &removals)? == ExitCode::Failure {
            return Ok(ExitCode::Failure);
        }

        let additions = compute_additions(layout, &declared, self.policy)?;
        debug!(target: SYNC_TARGET, additions = additions.len(), "computed additions");
        let outcome = run_sequence(&self.runner, &additions)?;

        info!(
            target: SYNC_TARGET,
            removed = removals.len(),
            imported = additions.len(),
            ?outcome,
            "synchronization finished"
        );
        Ok(outcome)
    }

    /// Runs `arguments` through Yarn inside the isolated workspace, then
    /// synchronizes when it succeeds.
    ///
    /// The workspace skeleton is created first. The proxied command runs
    /// with the baseline environment minus Yarn's path and linker overrides.
    ///
    /// # Errors
    ///
    /// Propagates any [`SyncError`] from creating the skeleton, starting the
    /// proxied command, or [`Synchronizer::sync`].
    pub fn proxy<I, S>(&self, layout: &ProjectLayout, arguments: I) -> Result<ExitCode, SyncError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        ensure_skeleton(layout)?;

        let command = SyncCommand::new(layout.workspace_dir(), arguments)
            .with_environment(sanitize(&self.environment, &YARN_OVERRIDE_VARIABLES));
        if self.runner.run(&command)? == ExitCode::Failure {
            info!(
                target: SYNC_TARGET,
                "proxied command failed, skipping synchronization"
            );
            return Ok(ExitCode::Failure);
        }

        self.sync(layout)
    }
}
