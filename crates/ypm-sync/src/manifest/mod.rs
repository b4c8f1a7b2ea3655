//! Declared plugin dependencies of the isolated workspace.
//!
//! The workspace's `package.json` is the single place where users declare
//! which plugins they want. Only its `dependencies` field is read; Yarn owns
//! everything else in the file.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::error::SyncError;

/// Tracing target for manifest reads.
const MANIFEST_TARGET: &str = "ypm_sync::manifest";

/// Manifest file name inside the isolated workspace.
pub const MANIFEST_FILE: &str = "package.json";

/// Package-name prefix every plugin dependency must carry.
pub const PLUGIN_NAME_PREFIX: &str = "yarn-plugin-";

/// Mapping from declared package identifier to version specifier.
///
/// Iteration follows identifier order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredDependencies {
    entries: BTreeMap<String, String>,
}

impl DeclaredDependencies {
    /// Returns true when `ident` is declared.
    #[must_use]
    pub fn contains(&self, ident: &str) -> bool {
        self.entries.contains_key(ident)
    }

    /// Number of declared dependencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over declared identifiers.
    pub fn idents(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for DeclaredDependencies
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(ident, version)| (ident.into(), version.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ManifestFile {
    #[serde(default)]
    dependencies: Option<BTreeMap<String, String>>,
}

/// Reads the dependencies declared by the workspace at `workspace`.
///
/// A missing manifest, or one without a `dependencies` object, declares
/// nothing.
///
/// # Errors
///
/// Returns [`SyncError::ParseManifest`] when the manifest is not valid JSON
/// of the expected shape, and [`SyncError::Io`] when it cannot be read.
pub fn read_declared_dependencies(workspace: &Path) -> Result<DeclaredDependencies, SyncError> {
    let path = workspace.join(MANIFEST_FILE);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!(
                target: MANIFEST_TARGET,
                path = %path.display(),
                "workspace manifest absent, nothing declared"
            );
            return Ok(DeclaredDependencies::default());
        }
        Err(error) => return Err(SyncError::io(path, error)),
    };

    let manifest: ManifestFile =
        serde_json::from_str(&raw).map_err(|source| SyncError::ParseManifest {
            path: path.clone(),
            source: Arc::new(source),
        })?;

    let entries = manifest.dependencies.unwrap_or_default();
    debug!(
        target: MANIFEST_TARGET,
        path = %path.display(),
        declared = entries.len(),
        "read workspace manifest"
    );
    Ok(DeclaredDependencies { entries })
}

/// A package identifier, `name` or `@scope/name`.
///
/// # Example
///
/// ```
/// use ypm_sync::PluginIdent;
///
/// let ident = PluginIdent::parse("@acme/yarn-plugin-deploy").expect("valid ident");
/// assert_eq!(ident.scope(), Some("acme"));
/// assert_eq!(ident.bundle_stem(), Some("plugin-deploy"));
/// assert_eq!(ident.to_string(), "@acme/yarn-plugin-deploy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginIdent {
    scope: Option<String>,
    name: String,
}

impl PluginIdent {
    /// Parses a declared identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidIdent`] when the scope or name is empty or
    /// the name contains a further `/`.
    pub fn parse(raw: &str) -> Result<Self, SyncError> {
        let invalid = || SyncError::InvalidIdent {
            ident: raw.to_owned(),
        };

        let (scope, name) = match raw.strip_prefix('@') {
            Some(scoped) => {
                let (scope, name) = scoped.split_once('/').ok_or_else(invalid)?;
                if scope.is_empty() {
                    return Err(invalid());
                }
                (Some(scope.to_owned()), name)
            }
            None => (None, raw),
        };

        if name.is_empty() || name.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            scope,
            name: name.to_owned(),
        })
    }

    /// Scope without the leading `@`, if any.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Package name without the scope.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// File stem of the plugin's built bundle: the name minus its leading
    /// `yarn-`, so `yarn-plugin-foo` yields `plugin-foo`.
    ///
    /// Returns `None` when the name lacks the `yarn-plugin-` prefix.
    #[must_use]
    pub fn bundle_stem(&self) -> Option<&str> {
        if self.name.starts_with(PLUGIN_NAME_PREFIX) {
            self.name.strip_prefix("yarn-")
        } else {
            None
        }
    }
}

impl fmt::Display for PluginIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "@{scope}/{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}
