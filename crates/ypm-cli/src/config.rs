//! Configuration loading for the CLI.
//!
//! Every argument after the program name belongs to Yarn, so the loader only
//! ever sees the program name and configuration comes from files and the
//! environment.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use ypm_config::Config;

use crate::AppError;

pub(crate) trait ConfigLoader {
    /// Loads configuration for the CLI from the process arguments.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(loader_arguments(args)).map_err(AppError::LoadConfiguration)
    }
}

/// Arguments handed to the configuration loader: the program name alone.
fn loader_arguments(args: &[OsString]) -> Vec<OsString> {
    args.first().cloned().into_iter().collect()
}
