use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("room_count must be between 4 and 8, got {0}")]
    RoomCount(usize),
    #[error("tick_interval_ms must be positive")]
    TickInterval,
    #[error("{0} must not be negative")]
    NegativeWindow(&'static str),
}

/// Tunables for a study session. Every field has a default, so a config file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Presses of the same room closer than this are treated as one
    pub debounce_ms: i64,
    /// An event identical to a logged one within this window is a replay
    pub replay_window_ms: i64,
    pub tick_interval_ms: u64,
    /// Rooms per floor plan, 4..=8
    pub room_count: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            replay_window_ms: 200,
            tick_interval_ms: 1000,
            room_count: 6,
        }
    }
}

impl ExperimentConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(4..=8).contains(&self.room_count) {
            return Err(ConfigError::RoomCount(self.room_count));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::TickInterval);
        }
        if self.debounce_ms < 0 {
            return Err(ConfigError::NegativeWindow("debounce_ms"));
        }
        if self.replay_window_ms < 0 {
            return Err(ConfigError::NegativeWindow("replay_window_ms"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ExperimentConfig::from_json(r#"{ "debounce_ms": 50 }"#).unwrap();
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.replay_window_ms, 200);
        assert_eq!(config.room_count, 6);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            ExperimentConfig::from_json(r#"{ "room_count": 9 }"#),
            Err(ConfigError::RoomCount(9))
        ));
        assert!(matches!(
            ExperimentConfig::from_json(r#"{ "tick_interval_ms": 0 }"#),
            Err(ConfigError::TickInterval)
        ));
        assert!(matches!(
            ExperimentConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
