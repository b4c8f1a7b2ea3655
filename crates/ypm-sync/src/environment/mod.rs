//! Environment snapshots and case-insensitive variable stripping.
//!
//! Commands run inside the isolated workspace must not inherit the outer
//! project's Yarn overrides: the workspace pins its own lockfile name and
//! linker mode in its `.yarnrc.yml`, and an inherited `YARN_RC_FILENAME`
//! would make Yarn ignore that file entirely.

use std::collections::HashMap;
use std::collections::hash_map::Iter;
use std::env;
use std::ffi::{OsStr, OsString};

/// Variables stripped before running a command inside the isolated
/// workspace.
pub const YARN_OVERRIDE_VARIABLES: [&str; 3] = [
    "YARN_RC_FILENAME",
    "YARN_LOCKFILE_FILENAME",
    "YARN_NODE_LINKER",
];

/// Snapshot of process environment variables.
///
/// Order is not preserved.
///
/// # Example
///
/// ```
/// use ypm_sync::{Environment, sanitize};
///
/// let ambient: Environment = [("FOO", "1"), ("yarn_node_linker", "pnp")]
///     .into_iter()
///     .collect();
/// let cleaned = sanitize(&ambient, &["YARN_NODE_LINKER"]);
/// assert_eq!(cleaned.len(), 1);
/// assert!(cleaned.get("FOO").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    variables: HashMap<OsString, OsString>,
}

impl Environment {
    /// Captures the current process environment.
    #[must_use]
    pub fn capture() -> Self {
        env::vars_os().collect()
    }

    /// Returns the value recorded for `key`, matched exactly.
    #[must_use]
    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.variables.get(key.as_ref()).map(OsString::as_os_str)
    }

    /// Number of variables in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns true when the snapshot holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterates over the variables in arbitrary order.
    pub fn iter(&self) -> Iter<'_, OsString, OsString> {
        self.variables.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<OsString>,
    V: Into<OsString>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Environment {
    type Item = (&'a OsString, &'a OsString);
    type IntoIter = Iter<'a, OsString, OsString>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Copies `environment`, dropping every variable whose name matches one of
/// `excluded` case-insensitively.
#[must_use]
pub fn sanitize(environment: &Environment, excluded: &[&str]) -> Environment {
    let lowered: Vec<String> = excluded.iter().map(|name| name.to_lowercase()).collect();
    environment
        .iter()
        .filter(|(key, _)| !lowered.contains(&key.to_string_lossy().to_lowercase()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
