use std::env;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const TURN_TIMEOUT_ENV: &str = "DICE_GAME_TURN_TIMEOUT_SECS";
pub const TICK_INTERVAL_ENV: &str = "DICE_GAME_TICK_INTERVAL_MS";

const DEFAULT_TURN_TIMEOUT_SECS: u32 = 10;
const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("turn timeout must be at least one second")]
    ZeroTimeout,
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Runtime settings consumed by the game service.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds a player gets per turn; the countdown resets to this.
    pub turn_timeout_secs: u32,
    /// How often the countdown worker ticks running games.
    pub tick_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            turn_timeout_secs: DEFAULT_TURN_TIMEOUT_SECS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl GameConfig {
    pub fn with_turn_timeout(turn_timeout_secs: u32) -> Self {
        GameConfig {
            turn_timeout_secs,
            ..GameConfig::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()
    }

    /// Read overrides from the environment; unset variables keep defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = GameConfig::default();
        if let Some(value) = parse_var(TURN_TIMEOUT_ENV)? {
            config.turn_timeout_secs = value;
        }
        if let Some(value) = parse_var(TICK_INTERVAL_ENV)? {
            config.tick_interval_ms = value;
        }
        config.validate()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.turn_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(self)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(None),
    }
}
