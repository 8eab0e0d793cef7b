//! Dialog flow for the Dashboard ChatBot
//!
//! The user picks a dashboard, names a filter in free text, and the bot hands
//! back the report link with a `&filter=` clause applied:
//!
//! ```text
//! start ──► {dashboard} ──► please_wait_{dashboard} ──► end ──► loop ⟲
//!   │                               │
//!   └──────► unknown_dashboard ◄────┘ (no link configured)
//!                    │
//!                    └──► end
//! ```
//!
//! [`DialogEngine`] is the pure state machine. [`ChatSession`] is the shell
//! the chat widget drives; it executes the [`FlowIntent`]s the engine returns
//! through a [`LinkOpener`].

pub mod engine;
pub mod error;
pub mod filter;
pub mod flow;
pub mod session;
pub mod state;

pub use engine::{DialogEngine, FlowIntent, Prompt, Transition};
pub use error::{ConversationError, Result};
pub use filter::{append_filter, FilterExpression};
pub use flow::{
    DashboardKind, FlowNode, FlowRegistry, FlowStateId, InputHandler, OptionSource, Path,
};
pub use session::{BotMessage, ChatSession, LinkOpener, Reply, TracingLinkOpener};
pub use state::ConversationState;
