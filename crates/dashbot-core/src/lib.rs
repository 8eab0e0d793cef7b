//! Core types, dashboard catalog and configuration for the Dashboard ChatBot.
//!
//! The catalog is the static vocabulary every other crate works against:
//! which dashboards exist, where their reports live, which table backs them
//! and which dimensions and values a user may filter by.

pub mod catalog;
pub mod config;
pub mod error;
pub mod types;

pub use catalog::{DashboardCatalog, DashboardEntry, Dimension, LinkResolver};
pub use config::{AppConfig, PresentationConfig};
pub use error::*;
pub use types::{normalize_dimension, DashboardName, SessionId};
