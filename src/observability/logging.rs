//! Structured logging configuration.

use crate::config::{LogFormat, LoggingSettings};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Primary filter variable.
pub const LOG_ENV: &str = "PROMPTRC_LOG";

/// Format override variable.
pub const LOG_FORMAT_ENV: &str = "PROMPTRC_LOG_FORMAT";

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Optional append-mode log file.
    pub file: Option<PathBuf>,
    /// Event filter.
    pub filter: EnvFilter,
}

impl LoggingConfig {
    /// Builds logging configuration from settings with env overrides.
    ///
    /// The filter comes from `PROMPTRC_LOG`, then `RUST_LOG`, then `debug`
    /// when verbose and `warn` otherwise.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let format = std::env::var(LOG_FORMAT_ENV)
            .ok()
            .as_deref()
            .and_then(LogFormat::parse)
            .or_else(|| settings.map(|s| s.format))
            .unwrap_or_default();

        Self {
            format,
            file: settings.and_then(|s| s.file.clone()),
            filter: build_filter(verbose),
        }
    }
}

fn build_filter(verbose: bool) -> EnvFilter {
    let directive = [LOG_ENV, "RUST_LOG"]
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()));
    if let Some(directive) = directive {
        if let Ok(filter) = EnvFilter::try_new(&directive) {
            return filter;
        }
    }
    EnvFilter::new(if verbose { "debug" } else { "warn" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_file_is_carried() {
        let settings = LoggingSettings {
            format: LogFormat::Json,
            file: Some(PathBuf::from("/tmp/promptrc.log")),
        };
        let config = LoggingConfig::from_settings(Some(&settings), false);
        assert_eq!(config.file, settings.file);
    }

    #[test]
    fn test_defaults_without_settings() {
        let config = LoggingConfig::from_settings(None, true);
        assert!(config.file.is_none());
    }
}
