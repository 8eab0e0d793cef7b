//! Logging setup for the Dashboard ChatBot
//!
//! The other crates only emit `tracing` events; whoever embeds the bot calls
//! [`init_tracing`] once to decide where those events go.

pub mod tracing_setup;

pub use tracing_setup::*;

use thiserror::Error;

/// Observability errors
#[derive(Error, Debug)]
pub enum ObservabilityError {
    #[error("Tracing initialization failed: {0}")]
    TracingInit(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, ObservabilityError>;
