//! Diagnostic logging for the CLI.
//!
//! Yarn owns stdout and the terminal while it runs, so the plugin manager's
//! own events go to stderr, filtered by `YPM_LOG_FILTER` and shaped by
//! `YPM_LOG_FORMAT`. The default filter keeps a normal run silent.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::{self, time::UtcTime};

use ypm_config::{Config, LogFormat};

static SUBSCRIBER_INSTALLED: OnceCell<()> = OnceCell::new();

type BoxedSubscriber = Box<dyn Subscriber + Send + Sync>;

/// Errors encountered while configuring diagnostic logging.
#[derive(Debug, thiserror::Error)]
pub(crate) enum TelemetryError {
    /// The configured filter is not valid `EnvFilter` syntax.
    #[error("invalid log filter `{expression}` (set via YPM_LOG_FILTER): {source}")]
    Filter {
        expression: String,
        #[source]
        source: ParseError,
    },
    /// Another subscriber was already installed for the process.
    #[error("failed to install the log subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the stderr subscriber on first use; later calls are no-ops.
pub(crate) fn initialise(config: &Config) -> Result<(), TelemetryError> {
    SUBSCRIBER_INSTALLED.get_or_try_init(|| {
        let subscriber = build_subscriber(config)?;
        tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
    })?;
    Ok(())
}

fn log_filter(config: &Config) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(config.log_filter()).map_err(|source| TelemetryError::Filter {
        expression: config.log_filter().to_owned(),
        source,
    })
}

fn build_subscriber(config: &Config) -> Result<BoxedSubscriber, TelemetryError> {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(log_filter(config)?)
        .with_target(true)
        .with_writer(io::stderr)
        // Colour only when stderr is an interactive terminal.
        .with_ansi(io::stderr().is_terminal())
        .with_timer(UtcTime::rfc_3339());

    Ok(match config.log_format() {
        LogFormat::Json => Box::new(builder.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder.compact().finish()),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn config_with_filter(filter: &str) -> Config {
        Config {
            log_filter: filter.to_owned(),
            ..Config::default()
        }
    }

    #[test]
    fn invalid_filter_names_the_expression() {
        let error = build_subscriber(&config_with_filter("ypm_sync=loudest"))
            .err()
            .expect("filter must be rejected");

        assert!(matches!(error, TelemetryError::Filter { .. }), "got {error:?}");
        let message = error.to_string();
        assert!(message.contains("ypm_sync=loudest"), "got {message:?}");
        assert!(message.contains("YPM_LOG_FILTER"), "got {message:?}");
    }

    #[rstest]
    #[case::compact(LogFormat::Compact)]
    #[case::json(LogFormat::Json)]
    fn valid_configuration_builds_a_subscriber(#[case] format: LogFormat) {
        let config = Config {
            log_format: format,
            ..config_with_filter("ypm_sync=debug,warn")
        };
        assert!(build_subscriber(&config).is_ok());
    }
}
