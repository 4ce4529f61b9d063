//! Protocol and bot configuration.
//!
//! ```toml
//! draw_move_limit = 30
//! game_ttl_hours = 24
//! transaction_attempts = 5
//!
//! [bot]
//! depth = 4
//! quiescence_depth = 3
//! move_time = 1500
//! ```
//!
//! Every key is optional; missing ones fall back to the defaults above.

use std::path::Path;

use checkers_core::SearchLimits;
use serde::{Deserialize, Serialize};

/// Errors while reading a config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Game protocol configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Half-moves without a capture or man move before the game is drawn
    pub draw_move_limit: u32,
    /// Lifetime of a record, used for `expireAt`
    pub game_ttl_hours: i64,
    /// How often a store transaction is re-run after losing a commit race
    pub transaction_attempts: u32,
    /// Limits for the smart bot
    pub bot: SearchLimits,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            draw_move_limit: 30,
            game_ttl_hours: 24,
            transaction_attempts: 5,
            bot: SearchLimits::default(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.game_ttl_hours)
    }

    /// Bot limits with a clock built from `bot.move_time`.
    pub fn bot_limits(&self) -> SearchLimits {
        self.bot.fresh()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
