//! Flow graph of the dialog.
//!
//! The graph is static: every state is a [`FlowStateId`] variant and its
//! descriptor comes from an exhaustive `match`, so adding a state without
//! describing it does not compile. Dashboards get their own copy of the
//! "pick a dimension" and "please wait" states.

use crate::error::ConversationError;
use dashbot_core::DashboardName;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Dashboards the dialog knows how to walk through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardKind {
    SalesRevenue,
    CostAnalysis,
    Production,
    RawMaterial,
}

impl DashboardKind {
    pub const ALL: [DashboardKind; 4] = [
        Self::SalesRevenue,
        Self::CostAnalysis,
        Self::Production,
        Self::RawMaterial,
    ];

    /// Canonical dashboard name, also the name of its dimension state
    pub fn name(&self) -> &'static str {
        match self {
            Self::SalesRevenue => "sales_revenue",
            Self::CostAnalysis => "cost_analysis",
            Self::Production => "production",
            Self::RawMaterial => "raw_material",
        }
    }

    pub fn dashboard_name(&self) -> DashboardName {
        DashboardName::normalize(self.name())
    }

    pub fn from_dashboard(name: &DashboardName) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name.as_str())
    }

    fn dimension_prompt(&self) -> &'static str {
        match self {
            Self::SalesRevenue => "Great choice! Please select a filter option:",
            Self::CostAnalysis => "Sure thing! Please choose a filter option:",
            Self::Production => "Excellent! Select a filter option for production:",
            Self::RawMaterial => "Awesome! Choose a filter option for raw material:",
        }
    }

    /// Spoken form of the name when no label is configured
    fn default_label(&self) -> String {
        self.name().replace('_', " ")
    }
}

/// Identifier of a state in the flow graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FlowStateId {
    Start,
    SelectDimension(DashboardKind),
    PleaseWait(DashboardKind),
    UnknownDashboard,
    End,
    Loop,
}

impl FlowStateId {
    /// Every state, in the order the dialog normally visits them
    pub fn all() -> Vec<FlowStateId> {
        let mut states = vec![Self::Start];
        states.extend(DashboardKind::ALL.into_iter().map(Self::SelectDimension));
        states.extend(DashboardKind::ALL.into_iter().map(Self::PleaseWait));
        states.extend([Self::UnknownDashboard, Self::End, Self::Loop]);
        states
    }

    pub fn name(&self) -> String {
        match self {
            Self::Start => "start".to_string(),
            Self::SelectDimension(kind) => kind.name().to_string(),
            Self::PleaseWait(kind) => format!("please_wait_{}", kind.name()),
            Self::UnknownDashboard => "unknown_dashboard".to_string(),
            Self::End => "end".to_string(),
            Self::Loop => "loop".to_string(),
        }
    }

}

impl fmt::Display for FlowStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for FlowStateId {
    type Err = ConversationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|state| state.name() == s)
            .ok_or_else(|| ConversationError::UnknownState(s.to_string()))
    }
}

impl From<FlowStateId> for String {
    fn from(state: FlowStateId) -> Self {
        state.name()
    }
}

impl TryFrom<String> for FlowStateId {
    type Error = ConversationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Where the options shown with a prompt come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSource {
    None,
    /// The dashboard labels
    Dashboards,
    /// Dimensions of the dashboard currently selected
    SelectedDimensions,
}

/// Input handlers run by non-redirect states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputHandler {
    SelectDashboard,
    SelectDimension(DashboardKind),
    ApplyFilter(DashboardKind),
}

/// How a state picks its successor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Path {
    Redirect(FlowStateId),
    Input(InputHandler),
}

/// Descriptor of one state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNode {
    pub id: FlowStateId,
    pub message: String,
    pub options: OptionSource,
    pub path: Path,
    /// The state moves on by itself after this pause, reusing the last input
    pub auto_advance: Option<Duration>,
}

/// Flat registry of every state of the dialog
#[derive(Debug, Clone)]
pub struct FlowRegistry {
    transition_delay: Duration,
    labels: HashMap<DashboardKind, String>,
}

impl FlowRegistry {
    pub fn new(transition_delay: Duration) -> Self {
        Self {
            transition_delay,
            labels: HashMap::new(),
        }
    }

    /// Label the wait message uses for `kind`
    pub fn with_label(mut self, kind: DashboardKind, label: impl Into<String>) -> Self {
        self.labels.insert(kind, label.into());
        self
    }

    fn wait_prompt(&self, kind: DashboardKind) -> String {
        let label = match self.labels.get(&kind) {
            Some(label) => label.trim().to_lowercase(),
            None => kind.default_label(),
        };
        format!("Please wait while we fetch {label} data...")
    }

    pub fn node(&self, id: FlowStateId) -> FlowNode {
        let (message, options, path, auto_advance) = match id {
            FlowStateId::Start => (
                "Hello! Welcome to the Dashboard ChatBot. Please choose a dashboard:".to_string(),
                OptionSource::Dashboards,
                Path::Input(InputHandler::SelectDashboard),
                None,
            ),
            FlowStateId::SelectDimension(kind) => (
                kind.dimension_prompt().to_string(),
                OptionSource::SelectedDimensions,
                Path::Input(InputHandler::SelectDimension(kind)),
                None,
            ),
            FlowStateId::PleaseWait(kind) => (
                self.wait_prompt(kind),
                OptionSource::None,
                Path::Input(InputHandler::ApplyFilter(kind)),
                Some(self.transition_delay),
            ),
            FlowStateId::UnknownDashboard => (
                "Sorry, I didn't recognize that dashboard. Please try again.".to_string(),
                OptionSource::None,
                Path::Redirect(FlowStateId::End),
                None,
            ),
            FlowStateId::End => (
                "Thank you for using the Dashboard ChatBot! Have a great day!".to_string(),
                OptionSource::None,
                Path::Redirect(FlowStateId::Loop),
                None,
            ),
            FlowStateId::Loop => (
                "You have reached the end of the conversation!".to_string(),
                OptionSource::None,
                Path::Redirect(FlowStateId::Loop),
                None,
            ),
        };

        FlowNode {
            id,
            message,
            options,
            path,
            auto_advance,
        }
    }

    pub fn nodes(&self) -> Vec<FlowNode> {
        FlowStateId::all().into_iter().map(|id| self.node(id)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_state_names_round_trip() {
        let states = FlowStateId::all();
        assert_eq!(states.len(), 13);

        let names: HashSet<String> = states.iter().map(FlowStateId::name).collect();
        assert_eq!(names.len(), 13);

        for state in states {
            assert_eq!(state.name().parse::<FlowStateId>().unwrap(), state);
        }
    }

    #[test]
    fn test_state_names() {
        assert_eq!(FlowStateId::Start.to_string(), "start");
        assert_eq!(
            FlowStateId::SelectDimension(DashboardKind::RawMaterial).to_string(),
            "raw_material"
        );
        assert_eq!(
            FlowStateId::PleaseWait(DashboardKind::CostAnalysis).to_string(),
            "please_wait_cost_analysis"
        );
        assert!("please_wait_inventory".parse::<FlowStateId>().is_err());
    }

    #[test]
    fn test_state_serializes_by_name() {
        let json =
            serde_json::to_string(&FlowStateId::PleaseWait(DashboardKind::Production)).unwrap();
        assert_eq!(json, "\"please_wait_production\"");

        let state: FlowStateId = serde_json::from_str("\"unknown_dashboard\"").unwrap();
        assert_eq!(state, FlowStateId::UnknownDashboard);
        assert!(serde_json::from_str::<FlowStateId>("\"nowhere\"").is_err());
    }

    #[test]
    fn test_kind_matches_normalized_name() {
        for kind in DashboardKind::ALL {
            let name = DashboardName::normalize(&kind.default_label());
            assert_eq!(name.as_str(), kind.name());
            assert_eq!(DashboardKind::from_dashboard(&name), Some(kind));
        }
        assert_eq!(DashboardKind::from_dashboard(&DashboardName::from("inventory")), None);
    }

    #[test]
    fn test_only_wait_states_auto_advance() {
        let registry = FlowRegistry::new(Duration::from_millis(2000));

        for node in registry.nodes() {
            match node.id {
                FlowStateId::PleaseWait(_) => {
                    assert_eq!(node.auto_advance, Some(Duration::from_millis(2000)));
                    assert!(matches!(node.path, Path::Input(InputHandler::ApplyFilter(_))));
                }
                _ => assert_eq!(node.auto_advance, None),
            }
        }
    }

    #[test]
    fn test_redirects() {
        let registry = FlowRegistry::new(Duration::ZERO);

        assert_eq!(
            registry.node(FlowStateId::UnknownDashboard).path,
            Path::Redirect(FlowStateId::End)
        );
        assert_eq!(registry.node(FlowStateId::End).path, Path::Redirect(FlowStateId::Loop));
        assert_eq!(registry.node(FlowStateId::Loop).path, Path::Redirect(FlowStateId::Loop));
    }

    #[test]
    fn test_wait_prompt() {
        let registry = FlowRegistry::new(Duration::ZERO);
        assert_eq!(
            registry.node(FlowStateId::PleaseWait(DashboardKind::RawMaterial)).message,
            "Please wait while we fetch raw material data..."
        );
    }

    #[test]
    fn test_wait_prompt_uses_configured_label() {
        let registry = FlowRegistry::new(Duration::ZERO)
            .with_label(DashboardKind::SalesRevenue, "Sales Revenue (FY23)");

        assert_eq!(
            registry.node(FlowStateId::PleaseWait(DashboardKind::SalesRevenue)).message,
            "Please wait while we fetch sales revenue (fy23) data..."
        );
        assert_eq!(
            registry.node(FlowStateId::PleaseWait(DashboardKind::Production)).message,
            "Please wait while we fetch production data..."
        );
    }
}
