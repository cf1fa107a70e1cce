//! Computer opponents: the agent seam, weighted evaluation with difficulty
//! presets, depth-limited minimax search, and a random baseline.

mod agent;
pub mod evaluation;
mod random;
pub mod search;

pub use agent::Agent;
pub use evaluation::{
    Difficulty, Evaluation, EvaluationConfig, EvaluationSettings, Evaluator, WeightedHeuristic,
};
pub use random::RandomAgent;
pub use search::{
    choose_move, Alternation, BestMove, Minimax, MinimaxAgent, SearchConfig, SearchOutcome,
    SearchStats,
};
