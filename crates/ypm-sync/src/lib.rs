//! Plugin synchronization engine for the Yarn plugin manager.
//!
//! The `ypm-sync` crate keeps the plugins imported into a Yarn project in
//! step with the dependencies declared by an isolated sub-workspace that
//! lives under `.yarn/plugins/plugin-manager`. Plugin packages are installed
//! and built inside that workspace by Yarn itself; this crate only decides
//! which `yarn plugin remove` and `yarn plugin import` invocations are needed
//! and runs them in order.
//!
//! # Architecture
//!
//! A synchronization pass reads two sources of truth, both fresh on every
//! pass:
//!
//! - the declared dependencies of the isolated workspace
//!   ([`read_declared_dependencies`]), and
//! - the plugins recorded in the project's `.yarnrc.yml`
//!   ([`read_installed_plugins`]), parsed once into [`PluginRecord`] values.
//!
//! The diff engine ([`compute_removals`], [`compute_additions`]) turns them
//! into [`SyncCommand`] values, and a [`CommandRunner`] executes them. The
//! production runner is [`YarnRunner`]; tests substitute doubles so no real
//! process is spawned.
//!
//! # Example
//!
//! ```rust,no_run
//! use ypm_sync::{ProjectLayout, Synchronizer, YarnRunner};
//!
//! # fn main() -> Result<(), ypm_sync::SyncError> {
//! let layout = ProjectLayout::new("/work/my-project");
//! let synchronizer = Synchronizer::new(YarnRunner::default());
//! let outcome = synchronizer.proxy(&layout, ["add", "yarn-plugin-foo"])?;
//! assert!(outcome.is_success());
//! # Ok(())
//! # }
//! ```

pub mod diff;
pub mod environment;
pub mod error;
pub mod host_config;
pub mod layout;
pub mod manifest;
pub mod process;
pub mod project;
pub mod record;
pub mod runner;
pub mod skeleton;
pub mod sync;

#[cfg(test)]
mod tests;

pub use self::diff::{HashMatchPolicy, compute_additions, compute_removals};
pub use self::environment::{Environment, YARN_OVERRIDE_VARIABLES, sanitize};
pub use self::error::SyncError;
pub use self::host_config::{
    ConfigDocument, ConfigStore, InstalledPlugin, YarnrcStore, read_installed_plugins,
};
pub use self::layout::ProjectLayout;
pub use self::manifest::{DeclaredDependencies, PluginIdent, read_declared_dependencies};
pub use self::process::YarnRunner;
pub use self::project::find_project_root;
pub use self::record::{ManagedPlugin, PluginRecord};
pub use self::runner::{CommandRunner, ExitCode, SyncCommand, run_sequence};
pub use self::skeleton::ensure_skeleton;
pub use self::sync::Synchronizer;
