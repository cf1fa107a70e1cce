//! # Minimax Connect Four
//!
//! A Connect Four rules engine with a configurable minimax opponent, played
//! through a terminal UI built with Ratatui.
//!
//! ## Modules
//!
//! - [`game`]: Rules engine: board, gravity drops, win/tie detection, state machine
//! - [`ai`]: Agent trait, weighted evaluation and difficulty presets, minimax search
//! - [`ui`]: Terminal UI and the background search worker
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod ui;
