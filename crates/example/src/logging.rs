//! Tracing subscriber setup for the demo client.
//!
//! Logs go to stderr so tool output on stdout stays machine-readable.
//!
//! ```
//! use lodestar_example::logging::{LogFormat, Logging};
//! use tracing::Level;
//!
//! Logging::new()
//!     .with_level(Level::DEBUG)
//!     .with_format(LogFormat::Json)
//!     .with_env_filter("lodestar_tools=trace,lodestar_schema=warn")
//!     .init();
//! ```

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    Pretty,
    /// Compact single-line output (default).
    #[default]
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

/// Subscriber configuration.
#[derive(Debug, Clone)]
pub struct Logging {
    /// Maximum log level, used when no filter is set or the filter is invalid.
    level: Level,
    /// Output format.
    format: LogFormat,
    /// Environment filter (e.g., "lodestar_tools=debug").
    env_filter: Option<String>,
    /// Whether to include span enter/exit events.
    span_events: bool,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Compact,
            env_filter: None,
            span_events: false,
        }
    }
}

impl Logging {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a filter string of the form `target=level,target=level,...`.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Returns the configured output format.
    #[must_use]
    pub fn format(&self) -> LogFormat {
        self.format
    }

    fn filter(&self) -> EnvFilter {
        match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        }
    }

    /// Installs the global subscriber.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init(&self) {
        let env_filter = self.filter();
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(span_events);

        // try_init fails only when a subscriber is already set.
        match self.format {
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(layer.pretty())
                    .try_init()
                    .ok();
            }
            LogFormat::Compact => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(layer.compact())
                    .try_init()
                    .ok();
            }
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(layer.json())
                    .try_init()
                    .ok();
            }
        }

        tracing::debug!(level = %self.level, format = ?self.format, "logging initialized");
    }
}
