use crate::error::SearchError;
use crate::game::{GameState, Position};

use super::search::SearchStats;

/// Universal interface for computer opponents.
pub trait Agent: Send {
    /// Select a move for the player to move in `state`.
    fn select_move(&mut self, state: &GameState) -> Result<Position, SearchError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;

    /// Instrumentation from the most recent search, if the agent searches.
    fn last_stats(&self) -> Option<SearchStats> {
        None
    }
}
