//! Conversation shell driven by the chat widget.
//!
//! A [`ChatSession`] owns one conversation: the current state, the choices
//! made so far and the collaborator that opens report links. It feeds user
//! input to the engine, carries out the intents the engine returns and moves
//! through "please wait" states on its own.

use crate::engine::{DialogEngine, FlowIntent, Prompt};
use crate::flow::FlowStateId;
use crate::state::ConversationState;
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashbot_core::SessionId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Opens a report link in a new navigable surface.
///
/// Opening is fire-and-forget: the session hands the URL over and moves on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkOpener: Send + Sync {
    async fn open(&self, url: &str) -> Result<()>;
}

/// Opener that only records the link in the log
#[derive(Debug, Clone, Default)]
pub struct TracingLinkOpener;

#[async_trait]
impl LinkOpener for TracingLinkOpener {
    async fn open(&self, url: &str) -> Result<()> {
        info!(url = %url, "Opening dashboard link");
        Ok(())
    }
}

/// A bot message produced while handling one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotMessage {
    pub state: FlowStateId,
    pub text: String,
    /// Pause before showing the message
    pub delay: Duration,
    /// How long the message stays before the flow moves on by itself
    pub hold: Option<Duration>,
}

/// Everything the widget needs to render after one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub messages: Vec<BotMessage>,
    pub state: FlowStateId,
    pub options: Vec<String>,
    /// Link handed to the opener, if any
    pub opened_link: Option<String>,
}

/// One conversation with one user
pub struct ChatSession {
    id: SessionId,
    engine: Arc<DialogEngine>,
    opener: Arc<dyn LinkOpener>,
    state: FlowStateId,
    context: ConversationState,
    bot_delay: Duration,
    started_at: DateTime<Utc>,
}

impl ChatSession {
    /// Start a conversation; bot messages carry the engine's configured delay
    pub fn new(engine: Arc<DialogEngine>, opener: Arc<dyn LinkOpener>) -> Self {
        let id = SessionId::new();
        let bot_delay = engine.presentation().bot_delay();
        info!(session_id = %id, "Conversation started");

        Self {
            id,
            engine,
            opener,
            state: FlowStateId::Start,
            context: ConversationState::new(),
            bot_delay,
            started_at: Utc::now(),
        }
    }

    /// Override the pause the widget should take before each bot message
    pub fn with_bot_delay(mut self, delay: Duration) -> Self {
        self.bot_delay = delay;
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> FlowStateId {
        self.state
    }

    pub fn context(&self) -> &ConversationState {
        &self.context
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// What to show for the current state
    pub fn prompt(&self) -> Prompt {
        self.engine.prompt(self.state, &self.context)
    }

    /// Handle one user input to completion.
    ///
    /// States that advance by themselves are run straight away with the same
    /// input, so a reply always ends on a state that waits for the user.
    pub async fn submit(&mut self, input: &str) -> Reply {
        debug!(session_id = %self.id, state = %self.state, input, "User input");

        let mut messages = Vec::new();
        let mut opened_link = None;

        loop {
            let transition = self.engine.transition(self.state, &self.context, input);
            self.state = transition.next;
            self.context = transition.context;

            if let Some(FlowIntent::OpenLink(url)) = transition.intent {
                self.open(&url).await;
                opened_link = Some(url);
            }

            let node = self.engine.node(self.state);
            messages.push(BotMessage {
                state: self.state,
                text: node.message,
                delay: self.bot_delay,
                hold: node.auto_advance,
            });

            if node.auto_advance.is_none() {
                break;
            }
        }

        let prompt = self.prompt();
        Reply {
            messages,
            state: self.state,
            options: prompt.options,
            opened_link,
        }
    }

    /// Drop everything chosen so far and go back to `start`
    pub fn restart(&mut self) -> Prompt {
        self.id = SessionId::new();
        self.state = FlowStateId::Start;
        self.context = ConversationState::new();
        self.started_at = Utc::now();
        info!(session_id = %self.id, "Conversation restarted");

        self.prompt()
    }

    async fn open(&self, url: &str) {
        info!(session_id = %self.id, url = %url, "Handing link to opener");
        if let Err(err) = self.opener.open(url).await {
            warn!(session_id = %self.id, error = %err, "Link opener failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::DashboardKind;
    use crate::ConversationError;
    use dashbot_core::AppConfig;
    use mockall::predicate::*;

    fn engine() -> Arc<DialogEngine> {
        Arc::new(DialogEngine::from_config(&AppConfig::builtin()).unwrap())
    }

    #[tokio::test]
    async fn test_full_conversation_opens_filtered_link() {
        let mut opener = MockLinkOpener::new();
        opener
            .expect_open()
            .with(function(|url: &str| url.ends_with("&filter=PRILFY2023/Year eq '2023'")))
            .times(1)
            .returning(|_| Ok(()));

        let mut session = ChatSession::new(engine(), Arc::new(opener));
        assert_eq!(session.prompt().state, FlowStateId::Start);

        let reply = session.submit("Sales Revenue").await;
        assert_eq!(reply.state, FlowStateId::SelectDimension(DashboardKind::SalesRevenue));
        assert_eq!(reply.options, vec!["Company", "Segment", "Sales Group", "Year"]);
        assert_eq!(reply.opened_link, None);

        let reply = session.submit("year 2023").await;
        assert_eq!(reply.state, FlowStateId::End);
        assert_eq!(reply.messages.len(), 2);
        assert_eq!(
            reply.messages[0].state,
            FlowStateId::PleaseWait(DashboardKind::SalesRevenue)
        );
        assert!(reply.messages[0].hold.is_some());
        assert_eq!(reply.messages[1].state, FlowStateId::End);
        assert!(reply.opened_link.unwrap().ends_with("&filter=PRILFY2023/Year eq '2023'"));
        assert_eq!(session.context().dimension.as_deref(), Some("year_2023"));
    }

    #[tokio::test]
    async fn test_opener_failure_does_not_break_conversation() {
        let mut opener = MockLinkOpener::new();
        opener
            .expect_open()
            .times(1)
            .returning(|_| Err(ConversationError::opener("popup blocked")));

        let mut session = ChatSession::new(engine(), Arc::new(opener));
        session.submit("Production").await;
        let reply = session.submit("anything").await;

        assert_eq!(reply.state, FlowStateId::End);
        assert!(reply.opened_link.is_some());
    }

    #[tokio::test]
    async fn test_unknown_dashboard_never_opens() {
        let mut opener = MockLinkOpener::new();
        opener.expect_open().never();

        let mut session = ChatSession::new(engine(), Arc::new(opener));
        let reply = session.submit("Inventory").await;
        assert_eq!(reply.state, FlowStateId::UnknownDashboard);
        assert_eq!(
            reply.messages[0].text,
            "Sorry, I didn't recognize that dashboard. Please try again."
        );

        assert_eq!(session.submit("ok").await.state, FlowStateId::End);
        assert_eq!(session.submit("ok").await.state, FlowStateId::Loop);
        assert_eq!(session.submit("Sales Revenue").await.state, FlowStateId::Loop);
    }

    #[tokio::test]
    async fn test_restart_discards_choices() {
        let mut session = ChatSession::new(engine(), Arc::new(TracingLinkOpener));
        let first_id = session.id();
        session.submit("Raw Material").await;
        assert!(session.context().dashboard.is_some());

        let prompt = session.restart();
        assert_eq!(prompt.state, FlowStateId::Start);
        assert_eq!(session.context(), &ConversationState::new());
        assert_ne!(session.id(), first_id);
    }

    #[tokio::test]
    async fn test_bot_delay_comes_from_config() {
        let mut session = ChatSession::new(engine(), Arc::new(TracingLinkOpener));

        let reply = session.submit("Cost Analysis").await;
        assert_eq!(reply.messages[0].delay, Duration::from_millis(1000));
        assert_eq!(reply.messages[0].hold, None);

        let reply = session.submit("anything").await;
        assert!(reply
            .messages
            .iter()
            .all(|m| m.delay == Duration::from_millis(1000)));
        assert_eq!(reply.messages[0].hold, Some(Duration::from_millis(2000)));
    }

    #[tokio::test]
    async fn test_bot_delay_override() {
        let mut config = AppConfig::builtin();
        config.presentation = config.presentation.with_bot_delay(250);
        let engine = Arc::new(DialogEngine::from_config(&config).unwrap());

        let mut session = ChatSession::new(engine.clone(), Arc::new(TracingLinkOpener));
        let reply = session.submit("Production").await;
        assert_eq!(reply.messages[0].delay, Duration::from_millis(250));

        let mut session = ChatSession::new(engine, Arc::new(TracingLinkOpener))
            .with_bot_delay(Duration::ZERO);
        let reply = session.submit("Production").await;
        assert_eq!(reply.messages[0].delay, Duration::ZERO);
    }
}
