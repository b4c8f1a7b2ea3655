//! Built-in configuration defaults.

use ypm_sync::HashMatchPolicy;

use crate::logging::LogFormat;

/// Default host-tool executable, resolved through `PATH`.
pub const DEFAULT_YARN_PATH: &str = ypm_sync::process::DEFAULT_YARN_EXECUTABLE;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default host-tool executable.
#[must_use]
pub fn default_yarn_path() -> String {
    DEFAULT_YARN_PATH.to_owned()
}

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default handling of plugins whose imported copy is already current.
#[must_use]
pub const fn default_hash_match_policy() -> HashMatchPolicy {
    HashMatchPolicy::AbortBatch
}
