//! Structured logging configuration.
//!
//! This module configures `tracing-subscriber` for the mapping service.
//!
//! # Log Format
//!
//! When JSON formatting is enabled, log entries are output as JSON objects:
//!
//! ```json
//! {"timestamp":"2024-01-15T10:30:00.000Z","level":"DEBUG","target":"urm_domain::store","fields":{"message":"created user resource mapping"},"span":{"namespace":"userresourcemappingsv1","resource_id":"0000000000000020","user_id":"0000000000000010","name":"create"}}
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use urm_server::observability::logging::{init_logging, LoggingConfig};
//!
//! init_logging(LoggingConfig::from_settings(&config.logging)?);
//! ```

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::config::{ConfigLoadError, LoggingSettings};

/// Configuration for structured logging.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Whether to use JSON format (true) or text format (false)
    pub json_format: bool,
    /// The default log level if RUST_LOG is not set
    pub default_level: Level,
    /// Whether to include span events (enter/exit)
    pub include_spans: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json_format: false,
            default_level: Level::INFO,
            include_spans: false,
        }
    }
}

impl LoggingConfig {
    /// JSON output.
    pub fn json() -> Self {
        Self {
            json_format: true,
            ..Default::default()
        }
    }

    /// Text output (development).
    pub fn text() -> Self {
        Self {
            json_format: false,
            ..Default::default()
        }
    }

    /// Builds the logging configuration from the `logging` config section.
    pub fn from_settings(settings: &LoggingSettings) -> Result<Self, ConfigLoadError> {
        let level = Level::from_str(&settings.level).map_err(|_| ConfigLoadError::Invalid {
            message: format!("logging.level is not a valid level: {}", settings.level),
        })?;
        Ok(Self {
            json_format: settings.json,
            default_level: level,
            include_spans: false,
        })
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Include span events in the output.
    pub fn with_spans(mut self) -> Self {
        self.include_spans = true;
        self
    }
}

/// Initialize the logging subsystem with the given configuration.
///
/// Call once at startup. Later calls have no effect because the subscriber
/// is global.
pub fn init_logging(config: LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_level.to_string()));

    let span_events = if config.include_spans {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .json()
                .with_span_events(span_events)
                .with_current_span(true)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        );

        // Ignore if a global subscriber is already set
        let _ = tracing::subscriber::set_global_default(subscriber);
    } else {
        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .pretty()
                .with_span_events(span_events)
                .with_target(true),
        );

        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

/// Creates a JSON subscriber writing to `writer`, for capturing log output
/// in tests.
pub fn create_json_layer<W>(writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(EnvFilter::new("trace"))
        .with(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_current_span(true),
        )
}
