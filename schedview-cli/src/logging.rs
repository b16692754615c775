//! Tracing setup for the binary

use anyhow::{anyhow, Result};
use schedview_config::domains::logging::{LogFormat, LogLevel, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Build the event filter.
///
/// `--log-level` wins, then `RUST_LOG`, then the configured level and
/// directives.
pub fn build_filter(config: &LoggingConfig, log_level: Option<&str>) -> EnvFilter {
    if let Some(value) = log_level {
        match cli_filter(value) {
            Some(filter) => return filter,
            None => eprintln!("Invalid log level '{}', ignoring it", value),
        }
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| config_filter(config))
}

/// A level name, or a directive list such as `info,schedview_client=debug`.
///
/// A bare word that is not a level would parse as a target name and
/// silence everything, so it is rejected.
fn cli_filter(value: &str) -> Option<EnvFilter> {
    if let Ok(level) = value.parse::<LogLevel>() {
        return Some(EnvFilter::new(level.as_str()));
    }
    if value.trim().eq_ignore_ascii_case("off") {
        return Some(EnvFilter::new("off"));
    }
    if !value.contains('=') && !value.contains(',') {
        return None;
    }
    EnvFilter::try_new(value).ok()
}

fn config_filter(config: &LoggingConfig) -> EnvFilter {
    let directives = config.filter_directives();
    EnvFilter::try_new(&directives).unwrap_or_else(|_| {
        eprintln!("Invalid log directives '{}', falling back to 'warn'", directives);
        EnvFilter::new("warn")
    })
}

/// Subscriber for the configuration loading phase, before the configured
/// one can be built
pub fn bootstrap_subscriber(log_level: Option<&str>) -> impl tracing::Subscriber + Send + Sync {
    let filter = log_level
        .and_then(cli_filter)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(LogLevel::default().as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

/// Install the global subscriber; events go to stderr so stdout stays
/// clean for `--output json`
pub fn init_tracing(config: &LoggingConfig, log_level: Option<&str>) -> Result<()> {
    let filter = build_filter(config, log_level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    let result = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| anyhow!("Failed to initialize tracing: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedview_config::domains::logging::LogLevel;

    #[test]
    fn test_cli_level_takes_precedence() {
        let config = LoggingConfig {
            level: LogLevel::Error,
            ..LoggingConfig::default()
        };
        let filter = build_filter(&config, Some("debug"));
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_config_directives_without_overrides() {
        let config = LoggingConfig {
            level: LogLevel::Info,
            directives: vec!["reqwest=warn".to_string()],
            ..LoggingConfig::default()
        };
        temp_env::with_var_unset("RUST_LOG", || {
            let filter = build_filter(&config, None);
            let rendered = filter.to_string();
            assert!(rendered.contains("info"));
            assert!(rendered.contains("reqwest=warn"));
        });
    }

    #[test]
    fn test_unknown_level_word_is_ignored() {
        let config = LoggingConfig {
            level: LogLevel::Error,
            ..LoggingConfig::default()
        };
        temp_env::with_var_unset("RUST_LOG", || {
            assert_eq!(build_filter(&config, Some("verbose")).to_string(), "error");
        });
    }

    #[test]
    fn test_cli_level_names_and_directives() {
        let config = LoggingConfig::default();
        assert_eq!(build_filter(&config, Some("WARNING")).to_string(), "warn");
        assert_eq!(build_filter(&config, Some("off")).to_string(), "off");

        let rendered = build_filter(&config, Some("info,schedview_client=debug")).to_string();
        assert!(rendered.contains("schedview_client=debug"));
    }

    #[test]
    fn test_bootstrap_subscriber_honours_cli_level() {
        tracing::subscriber::with_default(bootstrap_subscriber(Some("debug")), || {
            assert!(tracing::enabled!(tracing::Level::DEBUG));
            assert!(!tracing::enabled!(tracing::Level::TRACE));
        });

        temp_env::with_var_unset("RUST_LOG", || {
            tracing::subscriber::with_default(bootstrap_subscriber(None), || {
                assert!(tracing::enabled!(tracing::Level::WARN));
                assert!(!tracing::enabled!(tracing::Level::INFO));
            });
        });
    }

    #[test]
    fn test_rust_log_beats_config() {
        let config = LoggingConfig::default();
        temp_env::with_var("RUST_LOG", Some("trace"), || {
            assert_eq!(build_filter(&config, None).to_string(), "trace");
        });
    }
}
