//! Per-conversation state threaded through every transition

use dashbot_core::DashboardName;
use serde::{Deserialize, Serialize};

/// What the user has chosen so far.
///
/// Transitions never mutate a state in place; they return the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Dashboard picked at `start`
    pub dashboard: Option<DashboardName>,
    /// Normalized dimension choice ("type"), e.g. `sales_group`
    pub dimension: Option<String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dashboard(&self, dashboard: DashboardName) -> Self {
        Self {
            dashboard: Some(dashboard),
            ..self.clone()
        }
    }

    pub fn with_dimension(&self, dimension: impl Into<String>) -> Self {
        Self {
            dimension: Some(dimension.into()),
            ..self.clone()
        }
    }
}
