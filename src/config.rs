use std::path::Path;

use crate::ai::{Difficulty, EvaluationConfig, EvaluationSettings, SearchConfig};
use crate::error::ConfigError;
use crate::game::{GameState, Player, COLS, DEFAULT_WIN_CONDITION, ROWS};

/// Board and turn-order settings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub win_condition: usize,
    /// Which player (1 or 2) the computer controls
    pub ai_player: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rows: ROWS,
            cols: COLS,
            win_condition: DEFAULT_WIN_CONDITION,
            ai_player: 2,
        }
    }
}

impl GameConfig {
    /// Fresh game for these settings. Player 1 always moves first.
    pub fn new_game(&self) -> GameState {
        GameState::with_config(self.rows, self.cols, self.win_condition, Player::One)
    }

    pub fn ai_player(&self) -> Option<Player> {
        Player::from_id(self.ai_player)
    }
}

/// Opponent difficulty. `weights` is required when `difficulty = "custom"`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weights: Option<EvaluationConfig>,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            difficulty: Difficulty::Medium,
            weights: None,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameConfig,
    pub search: SearchConfig,
    pub ai: AiConfig,
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
        if self.game.rows == 0 {
            return Err(ConfigError::Validation("game.rows must be >= 1".into()));
        }
        if self.game.cols == 0 {
            return Err(ConfigError::Validation("game.cols must be >= 1".into()));
        }
        if self.game.win_condition == 0
            || self.game.win_condition > self.game.rows.max(self.game.cols)
        {
            return Err(ConfigError::Validation(
                "game.win_condition must be in [1, max(rows, cols)]".into(),
            ));
        }
        if self.game.ai_player().is_none() {
            return Err(ConfigError::Validation(
                "game.ai_player must be 1 or 2".into(),
            ));
        }

        if self.search.depth_limit == 0 {
            return Err(ConfigError::Validation(
                "search.depth_limit must be >= 1".into(),
            ));
        }
        if self.search.node_budget == Some(0) {
            return Err(ConfigError::Validation(
                "search.node_budget must be > 0 when set".into(),
            ));
        }

        match (self.ai.difficulty, &self.ai.weights) {
            (Difficulty::Custom, None) => {
                return Err(ConfigError::Validation(
                    "ai.weights is required when ai.difficulty is 'custom'".into(),
                ));
            }
            (_, Some(weights)) => weights.validate()?,
            _ => {}
        }

        Ok(())
    }

    /// Evaluation settings for the configured difficulty. Custom weights
    /// apply only with `difficulty = "custom"`.
    pub fn evaluation_settings(&self) -> EvaluationSettings {
        match (self.ai.difficulty, self.ai.weights) {
            (Difficulty::Custom, Some(weights)) => EvaluationSettings::custom(weights),
            (difficulty, _) => EvaluationSettings::new(difficulty),
        }
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}
