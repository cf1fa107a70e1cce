use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::{Board, Player, Position};

/// Scores for decisive positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalWeights {
    pub win: f64,
    pub loss: f64,
}

/// Per-piece bonuses for board location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionalWeights {
    pub center_column: f64,
    pub center_adjacent: f64,
}

/// Window scores. A "three" is one piece short of a win with the remaining
/// cell empty, a "two" is two short with both remaining cells empty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatWeights {
    pub open_three: f64,
    pub open_two: f64,
    pub opponent_open_three: f64,
    pub opponent_open_two: f64,
}

/// Weights consumed by [`WeightedHeuristic`].
///
/// Fields have no serde defaults: a config missing any weight fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub terminal: TerminalWeights,
    pub positional: PositionalWeights,
    pub threats: ThreatWeights,
}

/// Dotted names of every weight, in declaration order.
pub const WEIGHT_KEYS: [&str; 8] = [
    "terminal.win",
    "terminal.loss",
    "positional.center_column",
    "positional.center_adjacent",
    "threats.open_three",
    "threats.open_two",
    "threats.opponent_open_three",
    "threats.opponent_open_two",
];

impl EvaluationConfig {
    /// Parse a config from TOML text. Missing weights are an error.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EvaluationConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Assemble a config from a flat map of dotted weight names.
    pub fn from_weights(weights: &BTreeMap<String, f64>) -> Result<Self, ConfigError> {
        if let Some(unknown) = weights.keys().find(|k| !WEIGHT_KEYS.contains(&k.as_str())) {
            return Err(ConfigError::UnknownWeight(unknown.clone()));
        }
        let lookup = |key: &str| {
            weights
                .get(key)
                .copied()
                .ok_or_else(|| ConfigError::MissingWeight(key.to_string()))
        };

        let config = EvaluationConfig {
            terminal: TerminalWeights {
                win: lookup("terminal.win")?,
                loss: lookup("terminal.loss")?,
            },
            positional: PositionalWeights {
                center_column: lookup("positional.center_column")?,
                center_adjacent: lookup("positional.center_adjacent")?,
            },
            threats: ThreatWeights {
                open_three: lookup("threats.open_three")?,
                open_two: lookup("threats.open_two")?,
                opponent_open_three: lookup("threats.opponent_open_three")?,
                opponent_open_two: lookup("threats.opponent_open_two")?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Flatten into dotted weight names.
    pub fn to_weights(&self) -> BTreeMap<String, f64> {
        WEIGHT_KEYS
            .iter()
            .filter_map(|&key| self.get(key).map(|value| (key.to_string(), value)))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        let value = match key {
            "terminal.win" => self.terminal.win,
            "terminal.loss" => self.terminal.loss,
            "positional.center_column" => self.positional.center_column,
            "positional.center_adjacent" => self.positional.center_adjacent,
            "threats.open_three" => self.threats.open_three,
            "threats.open_two" => self.threats.open_two,
            "threats.opponent_open_three" => self.threats.opponent_open_three,
            "threats.opponent_open_two" => self.threats.opponent_open_two,
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: f64) -> Result<(), ConfigError> {
        let slot = match key {
            "terminal.win" => &mut self.terminal.win,
            "terminal.loss" => &mut self.terminal.loss,
            "positional.center_column" => &mut self.positional.center_column,
            "positional.center_adjacent" => &mut self.positional.center_adjacent,
            "threats.open_three" => &mut self.threats.open_three,
            "threats.open_two" => &mut self.threats.open_two,
            "threats.opponent_open_three" => &mut self.threats.opponent_open_three,
            "threats.opponent_open_two" => &mut self.threats.opponent_open_two,
            _ => return Err(ConfigError::UnknownWeight(key.to_string())),
        };
        *slot = value;
        Ok(())
    }

    /// Check that every weight is a finite non-negative number and that
    /// decisive scores outweigh every other weight.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in self.to_weights() {
            if !value.is_finite() {
                return Err(ConfigError::Validation(format!("{key} must be finite")));
            }
            if value < 0.0 {
                return Err(ConfigError::Validation(format!("{key} must be >= 0")));
            }
        }

        let largest_heuristic = WEIGHT_KEYS[2..]
            .iter()
            .filter_map(|&key| self.get(key))
            .fold(0.0_f64, f64::max);
        if self.terminal.win <= largest_heuristic {
            return Err(ConfigError::Validation(
                "terminal.win must exceed every positional and threat weight".into(),
            ));
        }
        if self.terminal.loss <= largest_heuristic {
            return Err(ConfigError::Validation(
                "terminal.loss must exceed every positional and threat weight".into(),
            ));
        }
        Ok(())
    }

    /// Largest absolute score [`WeightedHeuristic`] can give a non-decisive
    /// position on a `rows` x `cols` board.
    pub fn heuristic_bound(&self, rows: usize, cols: usize, win_condition: usize) -> f64 {
        let positional = self
            .positional
            .center_column
            .max(self.positional.center_adjacent);
        let threat = WEIGHT_KEYS[4..]
            .iter()
            .filter_map(|&key| self.get(key))
            .fold(0.0_f64, f64::max);

        let len = win_condition.max(1);
        let fits = |n: usize| (n + 1).saturating_sub(len);
        let windows = rows * fits(cols) + fits(rows) * cols + 2 * fits(rows) * fits(cols);

        (rows * cols) as f64 * positional + windows as f64 * threat
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        MEDIUM
    }
}

const EASY: EvaluationConfig = EvaluationConfig {
    terminal: TerminalWeights {
        win: 100_000.0,
        loss: 100_000.0,
    },
    positional: PositionalWeights {
        center_column: 1.0,
        center_adjacent: 0.0,
    },
    threats: ThreatWeights {
        open_three: 5.0,
        open_two: 1.0,
        opponent_open_three: 0.0,
        opponent_open_two: 0.0,
    },
};

const MEDIUM: EvaluationConfig = EvaluationConfig {
    terminal: TerminalWeights {
        win: 100_000.0,
        loss: 100_000.0,
    },
    positional: PositionalWeights {
        center_column: 3.0,
        center_adjacent: 1.0,
    },
    threats: ThreatWeights {
        open_three: 50.0,
        open_two: 10.0,
        opponent_open_three: 80.0,
        opponent_open_two: 10.0,
    },
};

const HARD: EvaluationConfig = EvaluationConfig {
    terminal: TerminalWeights {
        win: 1_000_000.0,
        loss: 1_000_000.0,
    },
    positional: PositionalWeights {
        center_column: 6.0,
        center_adjacent: 2.0,
    },
    threats: ThreatWeights {
        open_three: 100.0,
        open_two: 15.0,
        opponent_open_three: 150.0,
        opponent_open_two: 20.0,
    },
};

/// Named weight presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Explicit weights; only reachable through the config file
    #[value(skip)]
    Custom,
}

impl Difficulty {
    /// Preset weights, `None` for [`Difficulty::Custom`].
    pub fn preset(self) -> Option<EvaluationConfig> {
        match self {
            Difficulty::Easy => Some(EASY),
            Difficulty::Medium => Some(MEDIUM),
            Difficulty::Hard => Some(HARD),
            Difficulty::Custom => None,
        }
    }

    /// Next preset in the easy → medium → hard cycle.
    pub fn next(self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard | Difficulty::Custom => Difficulty::Easy,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Custom => "custom",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A difficulty label together with the weights it currently stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSettings {
    difficulty: Difficulty,
    config: EvaluationConfig,
}

impl EvaluationSettings {
    /// Settings for a preset difficulty. `Custom` starts from the medium weights.
    pub fn new(difficulty: Difficulty) -> Self {
        EvaluationSettings {
            difficulty,
            config: difficulty.preset().unwrap_or(MEDIUM),
        }
    }

    /// Custom settings from explicit weights.
    pub fn custom(config: EvaluationConfig) -> Self {
        EvaluationSettings {
            difficulty: Difficulty::Custom,
            config,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Switch label; preset difficulties replace every weight.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if let Some(preset) = difficulty.preset() {
            self.config = preset;
        }
        self.difficulty = difficulty;
    }

    /// Edit a single weight. The label becomes `Custom`.
    pub fn set_weight(&mut self, key: &str, value: f64) -> Result<(), ConfigError> {
        self.config.set(key, value)?;
        self.difficulty = Difficulty::Custom;
        Ok(())
    }
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self::new(Difficulty::Medium)
    }
}

/// Result of scoring a position from the AI player's point of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// The last move ended the game with a win
    Decisive(f64),
    Heuristic(f64),
}

impl Evaluation {
    pub fn score(self) -> f64 {
        match self {
            Evaluation::Decisive(score) | Evaluation::Heuristic(score) => score,
        }
    }

    pub fn is_decisive(self) -> bool {
        matches!(self, Evaluation::Decisive(_))
    }
}

/// Trait for evaluating a board position from the AI player's perspective.
pub trait Evaluator: Send {
    fn evaluate(
        &self,
        board: &Board,
        last_move: Option<Position>,
        ai_player: Player,
        win_condition: usize,
        config: &EvaluationConfig,
    ) -> Evaluation;

    /// Upper bound on the magnitude of any `Heuristic` score this evaluator
    /// returns. The search places decisive scores above it.
    fn heuristic_bound(
        &self,
        board: &Board,
        win_condition: usize,
        config: &EvaluationConfig,
    ) -> f64 {
        config.heuristic_bound(board.rows(), board.cols(), win_condition)
    }
}

/// Default evaluator: decisive on a completed run, otherwise centre control
/// plus a scan of every `win_condition`-long window.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedHeuristic;

impl WeightedHeuristic {
    fn score_window(
        own: usize,
        opp: usize,
        empty: usize,
        win_condition: usize,
        threats: &ThreatWeights,
    ) -> f64 {
        if win_condition < 2 {
            return 0.0;
        }
        let three = win_condition - 1;
        if own == three && empty == 1 {
            threats.open_three
        } else if win_condition > 2 && own == win_condition - 2 && empty == 2 {
            threats.open_two
        } else if opp == three && empty == 1 {
            -threats.opponent_open_three
        } else if win_condition > 2 && opp == win_condition - 2 && empty == 2 {
            -threats.opponent_open_two
        } else {
            0.0
        }
    }

    fn positional(board: &Board, ai_player: Player, weights: &PositionalWeights) -> f64 {
        let own_cell = ai_player.to_cell();
        let opp_cell = ai_player.other().to_cell();
        let center = board.cols() / 2;
        let mut score = 0.0;

        for col in 0..board.cols() {
            let weight = if col == center {
                weights.center_column
            } else if col + 1 == center || col == center + 1 {
                weights.center_adjacent
            } else {
                continue;
            };
            for row in 0..board.rows() {
                let cell = board.get(row, col);
                if cell == own_cell {
                    score += weight;
                } else if cell == opp_cell {
                    score -= weight;
                }
            }
        }
        score
    }

    fn windows(
        board: &Board,
        ai_player: Player,
        win_condition: usize,
        threats: &ThreatWeights,
    ) -> f64 {
        let own_cell = ai_player.to_cell();
        let opp_cell = ai_player.other().to_cell();
        let (rows, cols) = (board.rows() as isize, board.cols() as isize);
        let len = win_condition as isize;
        let mut score = 0.0;

        // Horizontal, vertical, diagonal \ and diagonal /
        for (dr, dc) in [(0, 1), (1, 0), (1, 1), (-1, 1)] {
            for row in 0..rows {
                for col in 0..cols {
                    let end_row = row + dr * (len - 1);
                    let end_col = col + dc * (len - 1);
                    if end_row < 0 || end_row >= rows || end_col >= cols {
                        continue;
                    }

                    let mut own = 0;
                    let mut opp = 0;
                    let mut empty = 0;
                    for i in 0..len {
                        let cell = board.get((row + dr * i) as usize, (col + dc * i) as usize);
                        match cell {
                            c if c == own_cell => own += 1,
                            c if c == opp_cell => opp += 1,
                            _ => empty += 1,
                        }
                    }
                    score += Self::score_window(own, opp, empty, win_condition, threats);
                }
            }
        }
        score
    }
}

impl Evaluator for WeightedHeuristic {
    fn evaluate(
        &self,
        board: &Board,
        last_move: Option<Position>,
        ai_player: Player,
        win_condition: usize,
        config: &EvaluationConfig,
    ) -> Evaluation {
        if let Some(pos) = last_move {
            if let Some(mover) = board.cell(pos).and_then(|c| c.owner()) {
                if board.detect_win(pos, mover, win_condition).is_some() {
                    return if mover == ai_player {
                        Evaluation::Decisive(config.terminal.win)
                    } else {
                        Evaluation::Decisive(-config.terminal.loss)
                    };
                }
            }
        }

        let score = Self::positional(board, ai_player, &config.positional)
            + Self::windows(board, ai_player, win_condition, &config.threats);
        Evaluation::Heuristic(score)
    }
}
