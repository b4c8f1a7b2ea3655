//! Domain errors raised by synchronization passes.
//!
//! All errors use a `thiserror`-derived enum with structured context so
//! callers can inspect the failure programmatically. I/O errors are wrapped in
//! `Arc` to satisfy the `result_large_err` Clippy lint and keep the error
//! cloneable.
//!
//! A child process that exits unsuccessfully is not an error: it is reported
//! as [`ExitCode::Failure`](crate::ExitCode::Failure). Errors cover everything
//! that prevents a pass from producing an exit code at all.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors arising from reading plugin state or running a pass.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// A file could not be read, written, or probed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The workspace manifest is not valid JSON.
    #[error("failed to parse manifest {path}: {source}")]
    ParseManifest {
        /// Manifest path.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// The host configuration file is not valid YAML.
    #[error("failed to parse host configuration {path}: {message}")]
    ParseHostConfig {
        /// Configuration path.
        path: PathBuf,
        /// Description of the parse failure.
        message: String,
    },

    /// The host configuration could not be serialised for writing.
    #[error("failed to serialise host configuration {path}: {message}")]
    WriteHostConfig {
        /// Configuration path.
        path: PathBuf,
        /// Description of the serialisation failure.
        message: String,
    },

    /// A declared dependency is not a valid package identifier.
    #[error("invalid package identifier: {ident}")]
    InvalidIdent {
        /// Identifier as declared in the manifest.
        ident: String,
    },

    /// A declared dependency does not follow the plugin naming convention.
    #[error("package name does not start with \"yarn-plugin-\": {ident}")]
    InvalidPluginName {
        /// Offending package identifier.
        ident: String,
    },

    /// No built bundle exists for a declared dependency.
    #[error("bundle not found in package: {ident}")]
    BundleNotFound {
        /// Package identifier whose bundle is missing.
        ident: String,
    },

    /// The host tool executable could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// Executable that was invoked.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// No project root exists at or above the starting directory.
    #[error("no Yarn project found at or above {start}")]
    ProjectNotFound {
        /// Directory the search started from.
        start: PathBuf,
    },
}

impl SyncError {
    /// Wraps an I/O error with the path that was being accessed.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }
}
