//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use ypm_sync::SyncError;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to resolve the current directory: {0}")]
    CurrentDir(io::Error),
    #[error(transparent)]
    Sync(#[from] SyncError),
}
