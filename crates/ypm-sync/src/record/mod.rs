//! Classification of installed plugin records.
//!
//! A record is *managed* when its spec points into the isolated workspace's
//! `node_modules`; everything else was imported by other means and is left
//! alone.

use crate::host_config::InstalledPlugin;

/// Spec prefix marking a record as imported from the isolated workspace.
pub const MANAGED_SPEC_PREFIX: &str = ".yarn/plugins/plugin-manager/node_modules/";

const BUNDLES_SEGMENT: &str = "/bundles/";

/// A record imported from the isolated workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedPlugin {
    record: InstalledPlugin,
    package_ident: String,
    plugin_name: String,
}

impl ManagedPlugin {
    /// Identifier of the package that supplied the bundle.
    #[must_use]
    pub fn package_ident(&self) -> &str {
        self.package_ident.as_str()
    }

    /// Name Yarn knows the plugin by, used with `plugin remove`.
    #[must_use]
    pub fn plugin_name(&self) -> &str {
        self.plugin_name.as_str()
    }

    /// The underlying host configuration record.
    #[must_use]
    pub const fn record(&self) -> &InstalledPlugin {
        &self.record
    }
}

/// An installed plugin record, classified by origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginRecord {
    /// Imported from the isolated workspace.
    Managed(ManagedPlugin),
    /// Imported by any other means.
    Foreign(InstalledPlugin),
}

impl PluginRecord {
    /// Classifies `record` by its spec.
    ///
    /// Managed specs have the shape
    /// `<prefix><package ident>/bundles/<plugin name>.js` (or `.cjs`). The
    /// package identifier runs up to the last `/bundles/` segment. A spec
    /// under the managed prefix that lacks that segment, or whose bundle file
    /// is not a named `.js`/`.cjs` file, cannot be attributed and is treated
    /// as foreign.
    ///
    /// # Example
    ///
    /// ```
    /// use ypm_sync::{InstalledPlugin, PluginRecord};
    ///
    /// let record = InstalledPlugin::new(
    ///     ".yarn/plugins/@yarnpkg/plugin-foo.cjs",
    ///     ".yarn/plugins/plugin-manager/node_modules/yarn-plugin-foo/bundles/@yarnpkg/plugin-foo.js",
    /// );
    /// let PluginRecord::Managed(managed) = PluginRecord::parse(record) else {
    ///     panic!("expected a managed record");
    /// };
    /// assert_eq!(managed.package_ident(), "yarn-plugin-foo");
    /// assert_eq!(managed.plugin_name(), "@yarnpkg/plugin-foo");
    /// ```
    #[must_use]
    pub fn parse(record: InstalledPlugin) -> Self {
        let Some(rest) = record.spec().strip_prefix(MANAGED_SPEC_PREFIX) else {
            return Self::Foreign(record);
        };
        let Some((ident, file)) = rest.rsplit_once(BUNDLES_SEGMENT) else {
            return Self::Foreign(record);
        };
        let Some(stem) = strip_bundle_extension(file) else {
            return Self::Foreign(record);
        };
        if ident.is_empty() || stem.is_empty() {
            return Self::Foreign(record);
        }

        let package_ident = ident.to_owned();
        let plugin_name = stem.to_owned();
        Self::Managed(ManagedPlugin {
            record,
            package_ident,
            plugin_name,
        })
    }

    /// The managed view of this record, if it is managed.
    #[must_use]
    pub const fn as_managed(&self) -> Option<&ManagedPlugin> {
        match self {
            Self::Managed(managed) => Some(managed),
            Self::Foreign(_) => None,
        }
    }

    /// The underlying host configuration record.
    #[must_use]
    pub const fn record(&self) -> &InstalledPlugin {
        match self {
            Self::Managed(managed) => managed.record(),
            Self::Foreign(record) => record,
        }
    }
}

fn strip_bundle_extension(file: &str) -> Option<&str> {
    file.strip_suffix(".cjs").or_else(|| file.strip_suffix(".js"))
}
