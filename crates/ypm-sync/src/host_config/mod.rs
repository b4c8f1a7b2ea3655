//! Access to the host tool's persisted configuration.
//!
//! Yarn records imported plugins in the project's `.yarnrc.yml` under a
//! `plugins` array. The engine never edits that array itself (Yarn does,
//! when it runs `plugin import` and `plugin remove`) but it reads it through
//! an explicit read/write transaction so callers can compose updates
//! without any process-wide state.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::SyncError;

/// Tracing target for host configuration access.
const HOST_CONFIG_TARGET: &str = "ypm_sync::host_config";

/// Parsed host configuration document.
///
/// The document is kept as a generic tree so fields this crate does not
/// understand survive a read/write cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Value,
}

impl ConfigDocument {
    /// Wraps an already parsed tree.
    #[must_use]
    pub const fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// The underlying tree.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.root
    }

    /// The `plugins` entries, when the field is present and array-typed.
    #[must_use]
    pub fn plugins(&self) -> Option<&[Value]> {
        self.root
            .get("plugins")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::from_value(Value::Object(Map::new()))
    }
}

/// Transactional access to the host configuration.
pub trait ConfigStore {
    /// Reads the current document.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] when the document cannot be read or parsed.
    fn read(&self) -> Result<ConfigDocument, SyncError>;

    /// Persists `document`, replacing the stored one.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] when the document cannot be serialised or
    /// written.
    fn write(&self, document: &ConfigDocument) -> Result<(), SyncError>;

    /// Reads the document, applies `apply`, and persists the result when it
    /// differs from what was read. Returns the resulting document.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`ConfigStore::read`] and
    /// [`ConfigStore::write`].
    fn update<F>(&self, apply: F) -> Result<ConfigDocument, SyncError>
    where
        F: FnOnce(ConfigDocument) -> ConfigDocument,
    {
        let current = self.read()?;
        let updated = apply(current.clone());
        if updated != current {
            self.write(&updated)?;
        }
        Ok(updated)
    }
}

/// [`ConfigStore`] backed by a `.yarnrc.yml` file.
///
/// A missing or blank file reads as an empty mapping.
#[derive(Debug, Clone)]
pub struct YarnrcStore {
    path: PathBuf,
}

impl YarnrcStore {
    /// Creates a store for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

impl ConfigStore for YarnrcStore {
    fn read(&self) -> Result<ConfigDocument, SyncError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(
                    target: HOST_CONFIG_TARGET,
                    path = %self.path.display(),
                    "host configuration absent"
                );
                return Ok(ConfigDocument::default());
            }
            Err(error) => return Err(SyncError::io(&self.path, error)),
        };

        if raw.trim().is_empty() {
            return Ok(ConfigDocument::default());
        }

        let root: Value =
            serde_saphyr::from_str(&raw).map_err(|error| SyncError::ParseHostConfig {
                path: self.path.clone(),
                message: error.to_string(),
            })?;
        Ok(ConfigDocument::from_value(root))
    }

    fn write(&self, document: &ConfigDocument) -> Result<(), SyncError> {
        let yaml = serde_saphyr::to_string(document.as_value()).map_err(|error| {
            SyncError::WriteHostConfig {
                path: self.path.clone(),
                message: error.to_string(),
            }
        })?;
        fs::write(&self.path, yaml).map_err(|error| SyncError::io(&self.path, error))?;
        debug!(
            target: HOST_CONFIG_TARGET,
            path = %self.path.display(),
            "host configuration written"
        );
        Ok(())
    }
}

/// One plugin entry recorded in the host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPlugin {
    path: String,
    spec: String,
}

impl InstalledPlugin {
    /// Creates a record from its two fields.
    #[must_use]
    pub fn new(path: impl Into<String>, spec: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            spec: spec.into(),
        }
    }

    /// Where Yarn keeps the imported bundle.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// What the plugin was imported from.
    #[must_use]
    pub fn spec(&self) -> &str {
        self.spec.as_str()
    }

    fn from_entry(entry: &Value) -> Option<Self> {
        match entry {
            Value::String(raw) => Some(Self::new(raw.as_str(), raw.as_str())),
            Value::Object(fields) => {
                let path = fields.get("path").and_then(Value::as_str);
                let spec = fields.get("spec").and_then(Value::as_str);
                match (path, spec) {
                    (Some(path), Some(spec)) => Some(Self::new(path, spec)),
                    (Some(only), None) | (None, Some(only)) => Some(Self::new(only, only)),
                    (None, None) => None,
                }
            }
            _ => None,
        }
    }
}

/// Lists the plugins recorded in the host configuration.
///
/// Entries are either bare strings, used as both path and spec, or mappings
/// with `path` and `spec` fields. Entries of any other shape are skipped.
/// The read goes through [`ConfigStore::update`] with an identity update, so
/// the stored document is left as it is.
///
/// # Errors
///
/// Propagates failures from the store.
pub fn read_installed_plugins<S: ConfigStore>(
    store: &S,
) -> Result<Vec<InstalledPlugin>, SyncError> {
    let document = store.update(|current| current)?;
    let Some(entries) = document.plugins() else {
        return Ok(Vec::new());
    };

    let mut installed = Vec::with_capacity(entries.len());
    for entry in entries {
        match InstalledPlugin::from_entry(entry) {
            Some(record) => installed.push(record),
            None => warn!(
                target: HOST_CONFIG_TARGET,
                %entry,
                "ignoring unrecognised plugin entry"
            ),
        }
    }
    debug!(
        target: HOST_CONFIG_TARGET,
        installed = installed.len(),
        "read installed plugins"
    );
    Ok(installed)
}
