use std::path::Path;

use crate::error::ConfigError;
use crate::game::Side;
use crate::session::GameMode;

/// Upper bound on the opponent's simulated thinking time.
pub const MAX_THINK_MS: u64 = 10_000;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub opponent: OpponentConfig,
}

/// Settings for a new game.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub mode: GameMode,
    /// Side the human plays against the opponent. `PlayerA` always moves first.
    pub human_side: Side,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            mode: GameMode::HumanVsOpponent,
            human_side: Side::PlayerA,
        }
    }
}

/// Automated opponent timing and randomness.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    pub think_min_ms: u64,
    pub think_max_ms: u64,
    /// Seed for reproducible column draws; OS entropy when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        OpponentConfig {
            think_min_ms: 400,
            think_max_ms: 900,
            seed: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.opponent.think_min_ms > self.opponent.think_max_ms {
            return Err(ConfigError::Validation(
                "opponent.think_min_ms must be <= opponent.think_max_ms".into(),
            ));
        }
        if self.opponent.think_max_ms > MAX_THINK_MS {
            return Err(ConfigError::Validation(format!(
                "opponent.think_max_ms must be <= {MAX_THINK_MS}"
            )));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
