use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("Unknown flow state: {0}")]
    UnknownState(String),

    #[error("Link opener failed: {0}")]
    Opener(String),

    #[error("Core error: {0}")]
    Core(#[from] dashbot_core::AppError),
}

impl ConversationError {
    pub fn opener(msg: impl Into<String>) -> Self {
        Self::Opener(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ConversationError>;
