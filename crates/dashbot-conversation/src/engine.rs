//! Dialog engine: runs one transition of the flow graph at a time.
//!
//! The engine is pure. It never opens anything itself; the `please_wait_*`
//! handlers return a [`FlowIntent::OpenLink`] for the caller to carry out.

use crate::filter::append_filter;
use crate::flow::{
    DashboardKind, FlowNode, FlowRegistry, FlowStateId, InputHandler, OptionSource, Path,
};
use crate::state::ConversationState;
use crate::Result;
use dashbot_core::{
    normalize_dimension, AppConfig, AppError, DashboardCatalog, DashboardName, LinkResolver,
    PresentationConfig,
};
use dashbot_nlp::PhraseMatcher;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Side effect requested by a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "url", rename_all = "snake_case")]
pub enum FlowIntent {
    OpenLink(String),
}

/// Result of running one transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: FlowStateId,
    pub context: ConversationState,
    pub intent: Option<FlowIntent>,
}

impl Transition {
    fn to(next: FlowStateId, context: ConversationState) -> Self {
        Self {
            next,
            context,
            intent: None,
        }
    }
}

/// What the presentation layer shows for a state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub state: FlowStateId,
    pub message: String,
    pub options: Vec<String>,
}

/// Runs the flow graph against the dashboard catalog
#[derive(Debug, Clone)]
pub struct DialogEngine {
    catalog: Arc<DashboardCatalog>,
    links: LinkResolver,
    matcher: PhraseMatcher,
    registry: FlowRegistry,
    presentation: PresentationConfig,
}

impl DialogEngine {
    /// Create an engine over a validated catalog.
    ///
    /// Every dashboard the flow graph walks through needs a catalog entry;
    /// a missing one is a configuration error reported here rather than
    /// in the middle of a conversation.
    pub fn new(
        catalog: Arc<DashboardCatalog>,
        presentation: &PresentationConfig,
    ) -> Result<Self> {
        let mut registry = FlowRegistry::new(presentation.transition_delay());
        for kind in DashboardKind::ALL {
            let Some(entry) = catalog.get(&kind.dashboard_name()) else {
                return Err(AppError::validation(format!(
                    "dashboard '{}' is part of the dialog but missing from the catalog",
                    kind.name()
                ))
                .into());
            };
            registry = registry.with_label(kind, &entry.label);
        }

        Ok(Self {
            links: catalog.link_resolver(),
            matcher: PhraseMatcher::new(catalog.clone()),
            registry,
            presentation: presentation.clone(),
            catalog,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(Arc::new(config.catalog()?), &config.presentation)
    }

    /// Presentation knobs the engine was built with
    pub fn presentation(&self) -> &PresentationConfig {
        &self.presentation
    }

    pub fn catalog(&self) -> &DashboardCatalog {
        &self.catalog
    }

    pub fn node(&self, state: FlowStateId) -> FlowNode {
        self.registry.node(state)
    }

    /// Message and options for `state` given what has been chosen so far
    pub fn prompt(&self, state: FlowStateId, context: &ConversationState) -> Prompt {
        let node = self.registry.node(state);

        let options = match node.options {
            OptionSource::None => Vec::new(),
            OptionSource::Dashboards => DashboardKind::ALL
                .into_iter()
                .filter_map(|kind| self.catalog.get(&kind.dashboard_name()))
                .map(|entry| entry.label.clone())
                .collect(),
            OptionSource::SelectedDimensions => context
                .dashboard
                .as_ref()
                .and_then(|name| self.catalog.get(name))
                .map(|entry| {
                    entry
                        .dimension_names()
                        .into_iter()
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        };

        Prompt {
            state,
            message: node.message,
            options,
        }
    }

    /// Run the transition of `state` on the latest user input
    #[instrument(skip(self, state, context), fields(state = %state))]
    pub fn transition(
        &self,
        state: FlowStateId,
        context: &ConversationState,
        input: &str,
    ) -> Transition {
        let transition = match self.registry.node(state).path {
            Path::Redirect(next) => Transition::to(next, context.clone()),
            Path::Input(InputHandler::SelectDashboard) => self.select_dashboard(context, input),
            Path::Input(InputHandler::SelectDimension(kind)) => {
                let dimension = normalize_dimension(input);
                Transition::to(FlowStateId::PleaseWait(kind), context.with_dimension(dimension))
            }
            Path::Input(InputHandler::ApplyFilter(kind)) => self.apply_filter(kind, context, input),
        };

        debug!(next = %transition.next, intent = ?transition.intent, "Transition");
        transition
    }

    fn select_dashboard(&self, context: &ConversationState, input: &str) -> Transition {
        let name = DashboardName::normalize(input);
        let next = match DashboardKind::from_dashboard(&name) {
            Some(kind) => FlowStateId::SelectDimension(kind),
            None => {
                debug!(dashboard = %name, "Dashboard is not part of the dialog");
                FlowStateId::UnknownDashboard
            }
        };

        Transition::to(next, context.with_dashboard(name))
    }

    fn apply_filter(
        &self,
        kind: DashboardKind,
        context: &ConversationState,
        input: &str,
    ) -> Transition {
        let Some(dashboard) = context.dashboard.as_ref() else {
            warn!("No dashboard selected before applying a filter");
            return Transition::to(FlowStateId::UnknownDashboard, context.clone());
        };

        let Some(link) = self.links.resolve(dashboard) else {
            debug!(dashboard = %dashboard, "No report link configured");
            return Transition::to(FlowStateId::UnknownDashboard, context.clone());
        };

        let table = self.catalog.table(&kind.dashboard_name()).unwrap_or_default();

        let url = match self.matcher.extract_filter(dashboard, input) {
            Ok(Some(filter)) => append_filter(link, table, &filter.dimension, &filter.values),
            Ok(None) => {
                debug!(dashboard = %dashboard, "No dimension mentioned, opening unfiltered report");
                link.to_string()
            }
            Err(err) => {
                warn!(
                    dashboard = %dashboard,
                    error = %err,
                    "Filter lookup failed, opening unfiltered report"
                );
                link.to_string()
            }
        };

        Transition {
            next: FlowStateId::End,
            context: context.clone(),
            intent: Some(FlowIntent::OpenLink(url)),
        }
    }
}
