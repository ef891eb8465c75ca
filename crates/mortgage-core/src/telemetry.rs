use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// HTTP plumbing stays at warn unless `RUST_LOG` overrides it; origination
/// request handling logs at the configured level.
const QUIET_DIRECTIVES: &str = "hyper=warn,tower=warn";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the configured level applies with
/// the noisy HTTP internals quieted.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => default_filter(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

fn default_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(format!("{log_level},{QUIET_DIRECTIVES}")).map_err(|source| {
        TelemetryError::EnvFilter {
            value: log_level.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_accepts_plain_levels() {
        assert!(default_filter("info").is_ok());
        assert!(default_filter("debug").is_ok());
    }

    #[test]
    fn default_filter_rejects_malformed_directives() {
        let error = default_filter("mortgage_core=verbose").unwrap_err();
        match error {
            TelemetryError::EnvFilter { value, .. } => {
                assert_eq!(value, "mortgage_core=verbose");
            }
            other => panic!("expected EnvFilter error, got {other:?}"),
        }
    }
}
