//! Locating the project a command was invoked from.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SyncError;

/// Tracing target for project discovery.
const PROJECT_TARGET: &str = "ypm_sync::project";

/// Lockfile marking a Yarn project root.
const LOCKFILE: &str = "yarn.lock";

/// Manifest marking a package root.
const MANIFEST: &str = "package.json";

/// Finds the root of the project containing `start`.
///
/// The nearest ancestor of `start` (inclusive) holding a `yarn.lock` wins.
/// Without any lockfile, the nearest ancestor holding a `package.json` is
/// used instead.
///
/// # Errors
///
/// Returns [`SyncError::ProjectNotFound`] when no ancestor holds either
/// file.
pub fn find_project_root(start: &Path) -> Result<PathBuf, SyncError> {
    let root = nearest_containing(start, LOCKFILE)
        .or_else(|| nearest_containing(start, MANIFEST))
        .ok_or_else(|| SyncError::ProjectNotFound {
            start: start.to_path_buf(),
        })?;
    debug!(target: PROJECT_TARGET, root = %root.display(), "located project root");
    Ok(root.to_path_buf())
}

fn nearest_containing<'a>(start: &'a Path, marker: &str) -> Option<&'a Path> {
    start
        .ancestors()
        .find(|candidate| candidate.join(marker).is_file())
}
