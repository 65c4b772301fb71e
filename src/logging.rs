//! Logging setup for autowire
//!
//! The container emits `tracing` events under the `autowire` target when the
//! `logging` feature is enabled: `debug!` for registrations and singleton
//! construction, `trace!` for per-resolve detail. This module installs a
//! subscriber for applications that do not bring their own; it requires the
//! `logging-pretty` or `logging-json` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use autowire::logging;
//!
//! logging::builder()
//!     .with_level(tracing::Level::TRACE)
//!     .container_only()
//!     .init();
//! ```

use tracing::Level;

/// Output format for the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON structured output (production)
    #[default]
    Json,
    /// Human-readable colorful output (development)
    Pretty,
}

/// Builder for subscriber configuration
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    level: Level,
    format: LogFormat,
    target: Option<&'static str>,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            format: LogFormat::Json,
            target: None,
        }
    }
}

impl LoggingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Only show events from a specific target
    pub fn with_target_filter(mut self, target: &'static str) -> Self {
        self.target = Some(target);
        self
    }

    /// Only show container events
    pub fn container_only(self) -> Self {
        self.with_target_filter("autowire")
    }

    /// Use JSON structured output
    pub fn json(mut self) -> Self {
        self.format = LogFormat::Json;
        self
    }

    /// Use pretty colorful output
    pub fn pretty(mut self) -> Self {
        self.format = LogFormat::Pretty;
        self
    }

    /// Install a global subscriber with the configured settings
    #[cfg(any(feature = "logging-json", feature = "logging-pretty"))]
    pub fn init(self) {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = if let Some(target) = self.target {
            EnvFilter::new(format!("{}={}", target, self.level))
        } else {
            EnvFilter::new(self.level.to_string())
        };

        match self.format {
            #[cfg(feature = "logging-json")]
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().json().with_target(true))
                    .init();
            }
            #[cfg(not(feature = "logging-json"))]
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_target(true))
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().pretty().with_target(true))
                    .init();
            }
        }
    }

    /// Install (no-op when no subscriber feature is enabled)
    #[cfg(not(any(feature = "logging-json", feature = "logging-pretty")))]
    pub fn init(self) {
        // Requires the logging-json or logging-pretty feature.
    }
}

/// Create a new logging builder
pub fn builder() -> LoggingBuilder {
    LoggingBuilder::new()
}

/// Install a subscriber with default settings
pub fn init() {
    builder().init();
}
