use crate::error::MoveError;

use super::board::{Board, Position, WinLine, COLS, ROWS};
use super::player::Player;

/// Run length needed to win in standard Connect Four.
pub const DEFAULT_WIN_CONDITION: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(WinLine),
    Tied,
}

/// Snapshot of a game in progress. Transitions return a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    last_move: Option<Position>,
    player_to_move: Player,
    win_condition: usize,
    status: GameStatus,
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        Self::with_config(ROWS, COLS, DEFAULT_WIN_CONDITION, Player::One)
    }

    /// Create an initial state for a custom board size and run length
    pub fn with_config(rows: usize, cols: usize, win_condition: usize, first: Player) -> Self {
        GameState {
            board: Board::with_size(rows, cols),
            last_move: None,
            player_to_move: first,
            win_condition: win_condition.max(1),
            status: GameStatus::InProgress,
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.player_to_move
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn last_move(&self) -> Option<Position> {
        self.last_move
    }

    pub fn win_condition(&self) -> usize {
        self.win_condition
    }

    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    /// Winning line if the game has been won
    pub fn winner(&self) -> Option<&WinLine> {
        match &self.status {
            GameStatus::Won(line) => Some(line),
            _ => None,
        }
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.status != GameStatus::InProgress
    }

    /// Resolved drop positions for every open column, empty once the game is over
    pub fn legal_moves(&self) -> Vec<Position> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_moves()
    }

    /// Apply a move and return new state (immutable)
    pub fn apply_move(&self, column: usize) -> Result<GameState, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let mover = self.player_to_move;
        let (board, pos) = self.board.drop_piece(column, mover)?;

        // Win takes precedence over a full board
        let status = match board.detect_win(pos, mover, self.win_condition) {
            Some(line) => GameStatus::Won(line),
            None if board.is_full() => GameStatus::Tied,
            None => GameStatus::InProgress,
        };

        let player_to_move = if status == GameStatus::InProgress {
            mover.other()
        } else {
            mover
        };

        Ok(GameState {
            board,
            last_move: Some(pos),
            player_to_move,
            win_condition: self.win_condition,
            status,
        })
    }

    /// Apply a requested `{row, col}`; the row is normalized to the drop row.
    pub fn apply_position(&self, requested: Position) -> Result<GameState, MoveError> {
        self.apply_move(requested.col)
    }

    /// Apply move mutably (for UI efficiency)
    pub fn apply_move_mut(&mut self, column: usize) -> Result<(), MoveError> {
        *self = self.apply_move(column)?;
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
