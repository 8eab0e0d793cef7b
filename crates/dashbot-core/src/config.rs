use crate::catalog::{builtin_entries, DashboardCatalog, DashboardEntry};
use crate::error::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub dashboards: Vec<DashboardEntry>,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

impl AppConfig {
    /// Configuration shipped with the bot
    pub fn builtin() -> Self {
        Self {
            dashboards: builtin_entries(),
            presentation: PresentationConfig::default(),
        }
    }

    /// Load configuration from a TOML file with `DASHBOT__` environment overrides
    pub fn load_from_file(path: &str) -> Result<Self> {
        Self::load_from_file_with_prefix(path, "DASHBOT")
    }

    /// Load configuration from file with environment overrides under a custom prefix
    pub fn load_from_file_with_prefix(path: &str, prefix: &str) -> Result<Self> {
        let builder = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix(prefix)
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;

        info!(
            path = %path,
            dashboards = config.dashboards.len(),
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Validate the configured dashboards and build the catalog
    pub fn catalog(&self) -> Result<DashboardCatalog> {
        DashboardCatalog::new(self.dashboards.clone())
    }
}

/// Knobs owned by the chat widget.
///
/// None of these change which state the dialog moves to; they are passed
/// through to whatever renders the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationConfig {
    #[serde(default = "default_bot_delay_ms")]
    pub bot_delay_ms: u64,
    #[serde(default = "default_transition_delay_ms")]
    pub transition_delay_ms: u64,
    #[serde(default = "default_true")]
    pub audio_enabled: bool,
    #[serde(default = "default_true")]
    pub voice_enabled: bool,
    #[serde(default = "default_true")]
    pub show_user_avatar: bool,
    #[serde(default = "default_true")]
    pub show_bot_avatar: bool,
}

impl PresentationConfig {
    pub fn new() -> Self {
        Self {
            bot_delay_ms: default_bot_delay_ms(),
            transition_delay_ms: default_transition_delay_ms(),
            audio_enabled: true,
            voice_enabled: true,
            show_user_avatar: true,
            show_bot_avatar: true,
        }
    }

    pub fn with_bot_delay(mut self, millis: u64) -> Self {
        self.bot_delay_ms = millis;
        self
    }

    pub fn with_transition_delay(mut self, millis: u64) -> Self {
        self.transition_delay_ms = millis;
        self
    }

    pub fn with_audio(mut self, enabled: bool) -> Self {
        self.audio_enabled = enabled;
        self
    }

    pub fn with_voice(mut self, enabled: bool) -> Self {
        self.voice_enabled = enabled;
        self
    }

    pub fn with_avatars(mut self, user: bool, bot: bool) -> Self {
        self.show_user_avatar = user;
        self.show_bot_avatar = bot;
        self
    }

    /// Pause before each bot message
    pub fn bot_delay(&self) -> Duration {
        Duration::from_millis(self.bot_delay_ms)
    }

    /// Pause before a "please wait" state moves on by itself
    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_bot_delay_ms() -> u64 {
    1000
}

fn default_transition_delay_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}
