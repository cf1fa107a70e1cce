//! Core Connect Four rules: board, gravity drops, win and tie detection, and
//! the game state machine with immutable transitions.

mod board;
mod player;
mod state;

pub use board::{Board, Cell, Direction, Position, WinLine, COLS, ROWS};
pub use player::Player;
pub use state::{GameState, GameStatus, DEFAULT_WIN_CONDITION};
