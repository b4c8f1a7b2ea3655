//! Creation of the isolated workspace's fixed files.
//!
//! The ignore rules and the workspace `.yarnrc.yml` are rewritten on every
//! run so they cannot drift. The manifest and lockfile belong to the user
//! and to Yarn, so they are only seeded when absent.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use crate::error::SyncError;
use crate::layout::ProjectLayout;
use crate::manifest::MANIFEST_FILE;

/// Tracing target for skeleton creation.
const SKELETON_TARGET: &str = "ypm_sync::skeleton";

/// Ignore rules written to the workspace's `.gitignore`.
pub const GITIGNORE: &str = "node_modules
**/.yarn/*
!**/.yarn/releases
!**/.yarn/plugins
!**/.yarn/sdks
!**/.yarn/versions
";

/// Workspace `.yarnrc.yml`, pinning the lockfile name and the linker.
pub const WORKSPACE_YARNRC: &str = "lockfileFilename: yarn.lock
nodeLinker: node-modules
";

/// Manifest seeded into a fresh workspace.
pub const EMPTY_MANIFEST: &str = "{\n}\n";

/// Lockfile seeded into a fresh workspace.
pub const EMPTY_LOCKFILE: &str = "\n";

/// Ensures the isolated workspace exists with its fixed files in place.
///
/// Idempotent: running it twice leaves the same files behind, and an
/// existing manifest or lockfile is never touched.
///
/// # Errors
///
/// Returns [`SyncError::Io`] when a directory or file cannot be created.
pub fn ensure_skeleton(layout: &ProjectLayout) -> Result<(), SyncError> {
    let workspace = layout.workspace_dir();
    fs::create_dir_all(workspace).map_err(|error| SyncError::io(workspace, error))?;

    overwrite(&workspace.join(".gitignore"), GITIGNORE)?;
    overwrite(&workspace.join(".yarnrc.yml"), WORKSPACE_YARNRC)?;
    create_if_absent(&workspace.join(MANIFEST_FILE), EMPTY_MANIFEST)?;
    create_if_absent(&workspace.join("yarn.lock"), EMPTY_LOCKFILE)?;

    debug!(
        target: SKELETON_TARGET,
        workspace = %workspace.display(),
        "workspace skeleton ready"
    );
    Ok(())
}

fn overwrite(path: &Path, contents: &str) -> Result<(), SyncError> {
    fs::write(path, contents).map_err(|error| SyncError::io(path, error))
}

fn create_if_absent(path: &Path, contents: &str) -> Result<(), SyncError> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == io::ErrorKind::AlreadyExists => return Ok(()),
        Err(error) => return Err(SyncError::io(path, error)),
    };
    file.write_all(contents.as_bytes())
        .map_err(|error| SyncError::io(path, error))?;
    debug!(target: SKELETON_TARGET, path = %path.display(), "seeded workspace file");
    Ok(())
}

#[cfg(test)]
mod tests;
