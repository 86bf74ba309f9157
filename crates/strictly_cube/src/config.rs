//! Engine configuration.

use crate::claim::DEFAULT_COMMIT_DELAY;
use crate::gesture::{DEFAULT_CLICK_MAX, DEFAULT_DRAG_THRESHOLD};
use crate::types::Player;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Tunable timings and thresholds for one engine.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct EngineConfig {
    /// Milliseconds between activating the gated cell and the claim landing.
    #[serde(default = "default_commit_delay_ms")]
    commit_delay_ms: u64,

    /// Pointer travel, in screen units, after which a press becomes a drag.
    #[serde(default = "default_drag_threshold")]
    drag_threshold: f32,

    /// Longest press, in milliseconds, that still counts as a click.
    #[serde(default = "default_click_max_ms")]
    click_max_ms: u64,

    /// Player who opens each game.
    #[serde(default)]
    first_player: Player,
}

fn default_commit_delay_ms() -> u64 {
    DEFAULT_COMMIT_DELAY.as_millis() as u64
}

fn default_drag_threshold() -> f32 {
    DEFAULT_DRAG_THRESHOLD
}

fn default_click_max_ms() -> u64 {
    DEFAULT_CLICK_MAX.as_millis() as u64
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            commit_delay_ms: default_commit_delay_ms(),
            drag_threshold: default_drag_threshold(),
            click_max_ms: default_click_max_ms(),
            first_player: Player::default(),
        }
    }
}

impl EngineConfig {
    /// Gated commit delay as a duration.
    pub fn commit_delay(&self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }

    /// Click duration limit as a duration.
    pub fn click_max(&self) -> Duration {
        Duration::from_millis(self.click_max_ms)
    }

    /// Parses configuration from TOML text. Missing keys take defaults.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(
            commit_delay_ms = config.commit_delay_ms,
            first_player = %config.first_player,
            "Config loaded successfully"
        );
        Ok(config)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
