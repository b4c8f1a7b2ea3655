//! Filesystem layout of a project managed by the plugin manager.
//!
//! Every path the engine touches is derived from the project root here so
//! the conventions live in one place.

use std::path::{Path, PathBuf};

/// Isolated workspace directory, relative to the project root.
pub const PLUGIN_MANAGER_DIR: &str = ".yarn/plugins/plugin-manager";

/// Directory Yarn copies imported bundles into, relative to the project root.
pub const IMPORTED_PLUGINS_DIR: &str = ".yarn/plugins/@yarnpkg";

/// Yarn's configuration file name.
pub const HOST_CONFIG_FILE: &str = ".yarnrc.yml";

/// Paths derived from a project root.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use ypm_sync::ProjectLayout;
///
/// let layout = ProjectLayout::new("/work/app");
/// assert_eq!(
///     layout.workspace_dir(),
///     Path::new("/work/app/.yarn/plugins/plugin-manager")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    workspace_dir: PathBuf,
}

impl ProjectLayout {
    /// Creates the layout for the project rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let workspace_dir = root.join(PLUGIN_MANAGER_DIR);
        Self {
            root,
            workspace_dir,
        }
    }

    /// The outer project's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// The isolated workspace directory.
    #[must_use]
    pub fn workspace_dir(&self) -> &Path {
        self.workspace_dir.as_path()
    }

    /// The outer project's Yarn configuration file.
    #[must_use]
    pub fn host_config_path(&self) -> PathBuf {
        self.root.join(HOST_CONFIG_FILE)
    }

    /// Where Yarn keeps the imported copy of the bundle named `stem`.
    #[must_use]
    pub fn imported_bundle_path(&self, stem: &str) -> PathBuf {
        self.root.join(IMPORTED_PLUGINS_DIR).join(format!("{stem}.cjs"))
    }

    /// Resolves a project-relative path against the root.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}
