use crate::ai::{Agent, EvaluationSettings, MinimaxAgent, RandomAgent, SearchStats};
use crate::config::AppConfig;
use crate::error::MoveError;
use crate::game::{GameState, GameStatus, Player};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;
use tracing::{info, warn};

use super::worker::SearchWorker;

/// Which computer opponent to play against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Opponent {
    Minimax,
    Random,
}

impl Opponent {
    pub fn name(self) -> &'static str {
        match self {
            Opponent::Minimax => "Minimax",
            Opponent::Random => "Random",
        }
    }
}

pub struct App {
    config: AppConfig,
    opponent: Opponent,
    settings: EvaluationSettings,
    ai_player: Player,
    game_state: GameState,
    worker: SearchWorker,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    last_stats: Option<SearchStats>,
    /// The computer's last search failed; no new request until reset
    search_failed: bool,
}

impl App {
    pub fn new(config: AppConfig, opponent: Opponent) -> Self {
        let settings = config.evaluation_settings();
        let ai_player = config.game.ai_player().unwrap_or(Player::Two);
        let game_state = config.game.new_game();
        let worker = SearchWorker::spawn(build_agent(opponent, &settings, &config));
        let selected_column = game_state.board().cols() / 2; // Start in middle

        App {
            config,
            opponent,
            settings,
            ai_player,
            game_state,
            worker,
            selected_column,
            should_quit: false,
            message: None,
            last_stats: None,
            search_failed: false,
        }
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    pub fn selected_column(&self) -> usize {
        self.selected_column
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn settings(&self) -> &EvaluationSettings {
        &self.settings
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn is_ai_turn(&self) -> bool {
        !self.game_state.is_terminal() && self.game_state.current_player() == self.ai_player
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.tick();
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    /// Start a computer search when it is the computer's turn and apply a
    /// finished one.
    pub fn tick(&mut self) {
        if self.is_ai_turn() && !self.worker.is_thinking() && !self.search_failed {
            self.worker.request(&self.game_state);
        }

        let Some(reply) = self.worker.poll() else {
            return;
        };
        self.last_stats = reply.stats;
        match reply.result {
            Ok(pos) => {
                info!(
                    player = self.ai_player.id(),
                    col = pos.col,
                    nodes = reply.stats.map(|s| s.nodes_visited),
                    "computer move"
                );
                self.apply(pos.col);
            }
            Err(err) => {
                warn!(error = %err, "computer search failed");
                self.search_failed = true;
                self.message = Some(format!("Computer error: {err}"));
            }
        }
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                }
            }
            KeyCode::Right => {
                if self.selected_column + 1 < self.game_state.board().cols() {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                self.reset();
                self.message = Some("New game started!".to_string());
            }
            KeyCode::Char('d') => {
                self.cycle_difficulty();
            }
            _ => {}
        }
    }

    fn reset(&mut self) {
        self.worker.reset();
        self.game_state = self.config.game.new_game();
        self.selected_column = self.game_state.board().cols() / 2;
        self.last_stats = None;
        self.search_failed = false;
        info!(generation = self.worker.generation(), "new game");
    }

    fn cycle_difficulty(&mut self) {
        if self.opponent != Opponent::Minimax {
            self.message = Some("Difficulty applies to the minimax opponent".to_string());
            return;
        }
        let next = self.settings.difficulty().next();
        self.settings.set_difficulty(next);
        self.worker
            .replace_agent(build_agent(self.opponent, &self.settings, &self.config));
        self.search_failed = false;
        info!(difficulty = %next, "difficulty changed");
        self.message = Some(format!("Difficulty: {next}"));
    }

    /// Drop the human's piece in the selected column
    fn drop_piece(&mut self) {
        if self.game_state.is_terminal() {
            self.message = Some("Game over! Press 'r' to restart.".to_string());
            return;
        }
        if self.is_ai_turn() {
            self.message = Some("Computer is thinking...".to_string());
            return;
        }
        self.apply(self.selected_column);
    }

    fn apply(&mut self, column: usize) {
        match self.game_state.apply_move_mut(column) {
            Ok(()) => {
                // Check if game just ended
                self.message = match self.game_state.status() {
                    GameStatus::Won(line) => Some(format!("{} wins!", line.player.name())),
                    GameStatus::Tied => Some("It's a draw!".to_string()),
                    GameStatus::InProgress => None,
                };
            }
            Err(MoveError::ColumnFull { .. }) => {
                self.message = Some("Column is full!".to_string());
            }
            Err(MoveError::InvalidColumn { .. }) => {
                self.message = Some("Invalid column!".to_string());
            }
            Err(MoveError::GameOver) => {
                self.message = Some("Game is over!".to_string());
            }
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let mode = self.mode_label();
        super::game_view::render(
            frame,
            &self.game_state,
            self.selected_column,
            &self.message,
            &mode,
            self.last_stats.as_ref(),
        );
    }

    fn mode_label(&self) -> String {
        let opponent = match self.opponent {
            Opponent::Minimax => format!(
                "{} ({}, depth {})",
                self.opponent.name(),
                self.settings.difficulty(),
                self.config.search.depth_limit
            ),
            Opponent::Random => self.opponent.name().to_string(),
        };
        let thinking = if self.worker.is_thinking() {
            "  |  thinking..."
        } else {
            ""
        };
        format!("Computer: {} as {}{}", opponent, self.ai_player.name(), thinking)
    }
}

fn build_agent(
    opponent: Opponent,
    settings: &EvaluationSettings,
    config: &AppConfig,
) -> Box<dyn Agent> {
    match opponent {
        Opponent::Minimax => Box::new(MinimaxAgent::new(settings.clone(), config.search)),
        Opponent::Random => Box::new(RandomAgent::new()),
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default(), Opponent::Minimax)
    }
}
