//! Phrase matcher.
//!
//! Maps free text onto the catalog vocabulary with case-insensitive substring
//! containment. Results always follow catalog order, never the order in which
//! the user typed things.

use crate::error::{NlpError, Result};
use dashbot_core::{DashboardCatalog, DashboardEntry, DashboardName};
use std::sync::Arc;
use tracing::{debug, trace};

/// Dimension picked from an utterance with the values it mentions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedFilter {
    pub dimension: String,
    pub values: Vec<String>,
}

/// Matches user utterances against a dashboard's dimensions and values
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    catalog: Arc<DashboardCatalog>,
}

impl PhraseMatcher {
    pub fn new(catalog: Arc<DashboardCatalog>) -> Self {
        Self { catalog }
    }

    /// True when the dashboard has a catalog entry to match against
    pub fn knows(&self, dashboard: &DashboardName) -> bool {
        self.catalog.contains(dashboard)
    }

    /// Every dimension of `dashboard` whose name occurs in `utterance`.
    ///
    /// # Errors
    ///
    /// Returns [`NlpError::UnknownDashboard`] when the dashboard is not in the catalog.
    pub fn find_dimensions(
        &self,
        dashboard: &DashboardName,
        utterance: &str,
    ) -> Result<Vec<String>> {
        let entry = self.entry(dashboard)?;
        let found = contained_in(utterance, entry.dimensions.iter().map(|d| d.name.as_str()));

        debug!(dashboard = %dashboard, dimensions = ?found, "Matched dimensions");
        Ok(found)
    }

    /// Every value of `dimension` whose text occurs in `utterance`.
    ///
    /// # Errors
    ///
    /// Returns [`NlpError::UnknownDashboard`] or [`NlpError::UnknownDimension`]
    /// when the lookup key is not configured.
    pub fn find_values(
        &self,
        dashboard: &DashboardName,
        dimension: &str,
        utterance: &str,
    ) -> Result<Vec<String>> {
        let entry = self.entry(dashboard)?;
        let dim = entry
            .dimension(dimension)
            .ok_or_else(|| NlpError::unknown_dimension(dashboard.as_str(), dimension))?;
        let found = contained_in(utterance, dim.values.iter().map(String::as_str));

        debug!(dashboard = %dashboard, dimension, values = ?found, "Matched values");
        Ok(found)
    }

    /// The filter an utterance asks for: its first matching dimension and the
    /// values of that dimension it mentions.
    ///
    /// Further dimensions mentioned in the same utterance are ignored.
    /// Returns `Ok(None)` when no dimension is mentioned.
    pub fn extract_filter(
        &self,
        dashboard: &DashboardName,
        utterance: &str,
    ) -> Result<Option<MatchedFilter>> {
        let Some(dimension) = self.find_dimensions(dashboard, utterance)?.into_iter().next() else {
            return Ok(None);
        };
        let values = self.find_values(dashboard, &dimension, utterance)?;

        Ok(Some(MatchedFilter { dimension, values }))
    }

    fn entry(&self, dashboard: &DashboardName) -> Result<&DashboardEntry> {
        self.catalog
            .get(dashboard)
            .ok_or_else(|| NlpError::unknown_dashboard(dashboard.as_str()))
    }
}

fn contained_in<'a>(utterance: &str, candidates: impl Iterator<Item = &'a str>) -> Vec<String> {
    let haystack = utterance.to_lowercase();

    candidates
        .filter(|candidate| {
            let hit = haystack.contains(&candidate.to_lowercase());
            trace!(candidate, hit, "Substring test");
            hit
        })
        .map(str::to_string)
        .collect()
}
