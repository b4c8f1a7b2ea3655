//! Computes the Yarn commands that bring installed plugins in line with the
//! declared ones.
//!
//! Both passes are pure with respect to Yarn: they only read the filesystem
//! and return [`SyncCommand`] values for the caller to execute. Removals are
//! computed from the installed records; additions are computed from the
//! declared dependencies and the bundles present in the isolated workspace.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use strum::{Display, EnumString};
use tracing::debug;

use crate::error::SyncError;
use crate::layout::{PLUGIN_MANAGER_DIR, ProjectLayout};
use crate::manifest::{DeclaredDependencies, PluginIdent};
use crate::record::PluginRecord;
use crate::runner::SyncCommand;

/// Tracing target for diff computation.
const DIFF_TARGET: &str = "ypm_sync::diff";

/// Bundle file extensions, in lookup order.
const BUNDLE_EXTENSIONS: [&str; 2] = ["js", "cjs"];

/// What the addition pass does when a plugin's imported copy already matches
/// its bundle.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HashMatchPolicy {
    /// Stop the pass and import nothing, including plugins already queued.
    #[default]
    AbortBatch,
    /// Skip that plugin and keep going.
    SkipPlugin,
}

// Configuration values go through `FromStr` so they match case-insensitively.
impl<'de> Deserialize<'de> for HashMatchPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "unknown hash match policy `{raw}`, expected `abort_batch` or `skip_plugin`"
            ))
        })
    }
}

/// Emits `plugin remove` for every managed record whose package is no longer
/// declared.
///
/// Foreign records are never touched. Commands run from the project root.
#[must_use]
pub fn compute_removals(
    layout: &ProjectLayout,
    installed: &[PluginRecord],
    declared: &DeclaredDependencies,
) -> Vec<SyncCommand> {
    installed
        .iter()
        .filter_map(PluginRecord::as_managed)
        .filter(|managed| !declared.contains(managed.package_ident()))
        .map(|managed| {
            debug!(
                target: DIFF_TARGET,
                package = managed.package_ident(),
                plugin = managed.plugin_name(),
                "plugin no longer declared"
            );
            SyncCommand::new(
                layout.root(),
                ["plugin", "remove", managed.plugin_name()],
            )
        })
        .collect()
}

/// Emits `plugin import` for every declared plugin whose bundle differs from
/// the imported copy, in identifier order.
///
/// # Errors
///
/// Returns [`SyncError::InvalidIdent`] or [`SyncError::InvalidPluginName`]
/// for a declared identifier that is not a plugin package,
/// [`SyncError::BundleNotFound`] when the package ships no bundle, and
/// [`SyncError::Io`] when a bundle or imported copy cannot be hashed. Any
/// error aborts the whole pass.
pub fn compute_additions(
    layout: &ProjectLayout,
    declared: &DeclaredDependencies,
    policy: HashMatchPolicy,
) -> Result<Vec<SyncCommand>, SyncError> {
    let mut commands = Vec::new();

    for raw in declared.idents() {
        let ident = PluginIdent::parse(raw)?;
        let stem = ident
            .bundle_stem()
            .ok_or_else(|| SyncError::InvalidPluginName {
                ident: raw.to_owned(),
            })?;

        let bundle = locate_bundle(layout, raw, stem)?;
        let destination = layout.imported_bundle_path(stem);

        if same_contents(&layout.resolve(&bundle), &destination)? {
            debug!(
                target: DIFF_TARGET,
                package = raw,
                ?policy,
                "imported copy is up to date"
            );
            match policy {
                HashMatchPolicy::AbortBatch => return Ok(Vec::new()),
                HashMatchPolicy::SkipPlugin => continue,
            }
        }

        debug!(target: DIFF_TARGET, package = raw, %bundle, "plugin needs import");
        commands.push(SyncCommand::new(
            layout.root(),
            ["plugin", "import", bundle.as_str()],
        ));
    }

    Ok(commands)
}

/// Finds the bundle shipped by `ident`, as a path relative to the project
/// root.
fn locate_bundle(layout: &ProjectLayout, ident: &str, stem: &str) -> Result<String, SyncError> {
    BUNDLE_EXTENSIONS
        .iter()
        .map(|extension| {
            format!("{PLUGIN_MANAGER_DIR}/node_modules/{ident}/bundles/@yarnpkg/{stem}.{extension}")
        })
        .find(|candidate| layout.resolve(candidate).is_file())
        .ok_or_else(|| SyncError::BundleNotFound {
            ident: ident.to_owned(),
        })
}

/// Returns true when `destination` exists and hashes the same as `source`.
fn same_contents(source: &Path, destination: &Path) -> Result<bool, SyncError> {
    let Some(imported) = digest_if_present(destination)? else {
        return Ok(false);
    };
    let bundled = digest_if_present(source)?.ok_or_else(|| {
        SyncError::io(
            source,
            io::Error::new(io::ErrorKind::NotFound, "bundle disappeared"),
        )
    })?;
    Ok(imported == bundled)
}

fn digest_if_present(path: &Path) -> Result<Option<Vec<u8>>, SyncError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(SyncError::io(path, error)),
    };
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|error| SyncError::io(path, error))?;
    Ok(Some(hasher.finalize().to_vec()))
}
