//! Configuration for the Yarn plugin manager.
//!
//! [`Config`] is layered by `ortho_config`: built-in defaults, then a TOML
//! configuration file, then `YPM_*` environment variables. The binary's own
//! argument vector is reserved for Yarn, so the command-line layer is only
//! populated when a caller passes flags to [`Config::load_from_iter`]
//! explicitly.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use ypm_sync::HashMatchPolicy;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_YARN_PATH, default_hash_match_policy, default_log_filter,
    default_log_filter_string, default_log_format, default_yarn_path,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "YPM")]
pub struct Config {
    /// Host-tool executable, looked up through `PATH` unless it is a path.
    #[ortho_config(default = default_yarn_path())]
    pub yarn_path: String,
    /// Tracing filter expression in `EnvFilter` syntax.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// What a pass does when a plugin's imported copy is already current.
    #[ortho_config(default = default_hash_match_policy())]
    pub hash_match_policy: HashMatchPolicy,
}

impl Config {
    /// Host-tool executable.
    #[must_use]
    pub fn yarn_path(&self) -> &str {
        self.yarn_path.as_str()
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Hash-match policy for the addition pass.
    #[must_use]
    pub const fn hash_match_policy(&self) -> HashMatchPolicy {
        self.hash_match_policy
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            yarn_path: default_yarn_path(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            hash_match_policy: default_hash_match_policy(),
        }
    }
}
