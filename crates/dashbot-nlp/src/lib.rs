//! # Dashboard ChatBot NLP
//!
//! Maps loosely typed user phrases onto the fixed filter vocabulary of a
//! dashboard. Matching is case-insensitive substring containment and nothing
//! more: a dimension or value is "mentioned" when its text appears anywhere
//! in the utterance.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use dashbot_core::{DashboardCatalog, DashboardName};
//! use dashbot_nlp::PhraseMatcher;
//!
//! let catalog = Arc::new(DashboardCatalog::builtin().unwrap());
//! let matcher = PhraseMatcher::new(catalog);
//! let sales = DashboardName::from("Sales Revenue");
//!
//! let dimensions = matcher.find_dimensions(&sales, "show me company and segment data").unwrap();
//! assert_eq!(dimensions, vec!["Company", "Segment"]);
//!
//! let values = matcher.find_values(&sales, "Company", "compare DEW and PRIL").unwrap();
//! assert_eq!(values, vec!["DEW", "PRIL"]);
//! ```

pub mod error;
pub mod matcher;

pub use error::{NlpError, Result};
pub use matcher::{MatchedFilter, PhraseMatcher};
