//! Structured logging setup
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! host's job. [`init_logging`] is the ready-made one: an [`EnvFilter`] plus a
//! JSON or pretty `fmt` layer, optionally behind `tracing-appender`'s
//! non-blocking writer.
//!
//! ## Environment Variables
//!
//! - `TRAMLINE_LOG_LEVEL`: trace/debug/info/warn/error (default `info`)
//! - `TRAMLINE_LOG_FORMAT`: json/pretty (default `json`)
//! - `TRAMLINE_LOG_ASYNC`: buffer output on a worker thread (default `false`)
//! - `TRAMLINE_LOG_TARGET_FILTER`: extra comma-separated filter directives
//! - `TRAMLINE_LOG_INCLUDE_LOCATION`: add file and line to events (default `false`)
//!
//! `RUST_LOG`, when set, takes precedence over `TRAMLINE_LOG_LEVEL`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    /// Unknown values fall back to JSON.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    pub async_logging: bool,
    /// Module filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location (dev only)
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            async_logging: false,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            log_level: env::var("TRAMLINE_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: env::var("TRAMLINE_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            async_logging: env::var("TRAMLINE_LOG_ASYNC")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.async_logging),
            target_filter: env::var("TRAMLINE_LOG_TARGET_FILTER").ok(),
            include_location: env::var("TRAMLINE_LOG_INCLUDE_LOCATION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.include_location),
        }
    }

    /// Parsed level; unknown names mean `info`.
    #[must_use]
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Build the filter: `RUST_LOG` if set, otherwise the configured level,
    /// plus any target directives. Invalid directives are an error.
    pub fn env_filter(&self) -> Result<EnvFilter> {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));
        if let Some(targets) = &self.target_filter {
            for directive in targets.split(',').map(str::trim).filter(|d| !d.is_empty()) {
                let parsed = directive
                    .parse::<Directive>()
                    .with_context(|| format!("invalid log filter directive: {directive}"))?;
                filter = filter.add_directive(parsed);
            }
        }
        Ok(filter)
    }
}

/// Install the global subscriber described by `config`.
///
/// With `async_logging` the returned guard owns the writer thread; keep it
/// alive for the life of the process or buffered events are lost.
///
/// # Errors
///
/// An invalid filter directive, or a global subscriber already installed.
pub fn init_logging(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = config.env_filter()?;
    let (writer, guard) = if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
        (Some(non_blocking), Some(guard))
    } else {
        (None, None)
    };

    let fmt_layer = match (config.format, writer) {
        (LogFormat::Json, Some(w)) => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(w)
            .boxed(),
        (LogFormat::Json, None) => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        (LogFormat::Pretty, Some(w)) => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(w)
            .boxed(),
        (LogFormat::Pretty, None) => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("PRETTY"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("whatever"), LogFormat::Json);
    }

    #[test]
    fn test_level_parse() {
        let mut config = LogConfig::default();
        assert_eq!(config.level(), Level::INFO);
        config.log_level = "DEBUG".into();
        assert_eq!(config.level(), Level::DEBUG);
        config.log_level = "loud".into();
        assert_eq!(config.level(), Level::INFO);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LogConfig =
            serde_yaml::from_str("format: pretty\ninclude_location: true\n").unwrap();
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.include_location);
        assert_eq!(config.log_level, "info");
        assert!(!config.async_logging);
    }

    #[test]
    fn test_invalid_target_filter_is_error() {
        let config = LogConfig {
            target_filter: Some("tramline=debug,tramline=loudest".into()),
            ..LogConfig::default()
        };
        assert!(config.env_filter().is_err());

        let config = LogConfig {
            target_filter: Some("tramline=debug, ,todo_app=trace".into()),
            ..LogConfig::default()
        };
        assert!(config.env_filter().is_ok());
    }
}
