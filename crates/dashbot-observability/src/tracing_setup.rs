//! Tracing subscriber setup

use crate::{ObservabilityError, Result};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Tracing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    /// Service name reported at startup
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Filter directive used when `RUST_LOG` is not set
    pub log_level: String,
    /// Enable JSON logging
    pub json_logs: bool,
    /// Enable span events (enter, exit)
    pub span_events: bool,
    /// Enable colored output (for console)
    pub colored_output: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "dashboard-chatbot".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            span_events: false,
            colored_output: true,
        }
    }
}

impl TracingConfig {
    pub fn production() -> Self {
        Self {
            json_logs: true,
            colored_output: false,
            ..Default::default()
        }
    }

    pub fn with_service_name(mut self, name: &str) -> Self {
        self.service_name = name.to_string();
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Filter from `RUST_LOG`, falling back to the configured level
    pub fn env_filter(&self) -> Result<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.log_level).map_err(|e| {
                ObservabilityError::Configuration(format!(
                    "invalid log level '{}': {}",
                    self.log_level, e
                ))
            }),
        }
    }
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let subscriber = tracing_subscriber::registry().with(config.env_filter()?);

    let span_events = if config.span_events {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    };

    if config.json_logs {
        let fmt_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(span_events);
        subscriber
            .with(fmt_layer)
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(config.colored_output)
            .with_span_events(span_events);
        subscriber
            .with(fmt_layer)
            .try_init()
            .map_err(|e| ObservabilityError::TracingInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        "Tracing initialized"
    );

    Ok(())
}
