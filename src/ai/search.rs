use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::SearchError;
use crate::game::{Board, GameState, Player, Position};

use super::agent::Agent;
use super::evaluation::{
    Evaluation, EvaluationConfig, EvaluationSettings, Evaluator, WeightedHeuristic,
};

/// How the maximizing flag propagates to child nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alternation {
    /// Maximize on the AI's plies, minimize on the opponent's.
    #[default]
    Strict,
    /// Every node below the root minimizes, so only the root maximizes.
    /// A weaker opponent than `Strict`.
    MinimizeBelowRoot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies explored before falling back to the heuristic
    pub depth_limit: usize,
    pub alpha_beta: bool,
    pub alternation: Alternation,
    /// Stop expanding after this many nodes and return the best move so far
    pub node_budget: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth_limit: 3,
            alpha_beta: true,
            alternation: Alternation::Strict,
            node_budget: None,
        }
    }
}

/// A root move and its minimax value from the AI player's perspective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestMove {
    pub position: Position,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Positions evaluated below the root
    pub nodes_visited: u64,
    /// Alpha-beta cutoffs taken
    pub cutoffs: u64,
    /// The node budget ran out before the search finished
    pub budget_exhausted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub best: BestMove,
    pub stats: SearchStats,
}

/// Depth-limited minimax over one root position.
pub struct Minimax<'a> {
    evaluator: &'a dyn Evaluator,
    config: &'a EvaluationConfig,
    ai_player: Player,
    win_condition: usize,
    search: SearchConfig,
    stats: SearchStats,
}

impl<'a> Minimax<'a> {
    pub fn new(
        evaluator: &'a dyn Evaluator,
        config: &'a EvaluationConfig,
        ai_player: Player,
        win_condition: usize,
        search: SearchConfig,
    ) -> Self {
        Minimax {
            evaluator,
            config,
            ai_player,
            win_condition,
            search,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Minimax value of `board` with `to_move` about to play.
    ///
    /// `depth` is the ply of this node (root children are at depth 1).
    pub fn value(
        &mut self,
        board: &Board,
        depth: usize,
        is_maximizing: bool,
        to_move: Player,
        last_move: Option<Position>,
    ) -> f64 {
        self.node(
            board,
            depth,
            is_maximizing,
            to_move,
            last_move,
            f64::NEG_INFINITY,
            f64::INFINITY,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn node(
        &mut self,
        board: &Board,
        depth: usize,
        is_maximizing: bool,
        to_move: Player,
        last_move: Option<Position>,
        mut alpha: f64,
        mut beta: f64,
    ) -> f64 {
        self.stats.nodes_visited += 1;

        let evaluation = self.evaluator.evaluate(
            board,
            last_move,
            self.ai_player,
            self.win_condition,
            self.config,
        );
        if let Evaluation::Decisive(score) = evaluation {
            return self.decisive_value(board, score, depth);
        }

        if board.is_full() {
            return 0.0;
        }
        if depth >= self.search.depth_limit {
            return evaluation.score();
        }

        let child_maximizing = match self.search.alternation {
            Alternation::Strict => !is_maximizing,
            Alternation::MinimizeBelowRoot => false,
        };

        let mut best = if is_maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        let mut explored = false;

        for pos in board.legal_moves() {
            if self.budget_spent() {
                break;
            }
            explored = true;
            let child = board.apply_move(pos, to_move);
            let score = self.node(
                &child,
                depth + 1,
                child_maximizing,
                to_move.other(),
                Some(pos),
                alpha,
                beta,
            );

            if is_maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if self.search.alpha_beta && alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        if explored {
            best
        } else {
            evaluation.score()
        }
    }

    /// Score for a decisive node at `depth`.
    ///
    /// Wins land above and losses below every heuristic score the evaluator
    /// can produce on this board. Nearer wins score higher, nearer losses lower.
    fn decisive_value(&self, board: &Board, score: f64, depth: usize) -> f64 {
        let bound = self
            .evaluator
            .heuristic_bound(board, self.win_condition, self.config);
        let plies_left = self.search.depth_limit.saturating_sub(depth) as f64;
        let margin = bound + 1.0 + plies_left;
        if score > 0.0 {
            score + margin
        } else {
            score - margin
        }
    }

    /// Whether another node would go past the node budget.
    fn budget_spent(&mut self) -> bool {
        if self
            .search
            .node_budget
            .is_some_and(|budget| self.stats.nodes_visited >= budget)
        {
            self.stats.budget_exhausted = true;
        }
        self.stats.budget_exhausted
    }
}

/// Pick the best move for the player to move in `state`.
///
/// Root moves are scored left to right and the first move reaching the
/// maximum score wins ties.
#[instrument(skip_all, fields(player = state.current_player().id(), depth = search.depth_limit))]
pub fn choose_move(
    state: &GameState,
    evaluator: &dyn Evaluator,
    config: &EvaluationConfig,
    search: &SearchConfig,
) -> Result<SearchOutcome, SearchError> {
    config.validate()?;

    let moves = state.legal_moves();
    let Some(&first) = moves.first() else {
        return Err(SearchError::NoLegalMoves);
    };

    let ai = state.current_player();
    let mut minimax = Minimax::new(evaluator, config, ai, state.win_condition(), *search);
    let mut best: Option<BestMove> = None;
    let mut fallback_score = f64::NEG_INFINITY;

    for pos in moves {
        if minimax.budget_spent() {
            break;
        }
        let board = state.board().apply_move(pos, ai);
        let alpha = match (search.alpha_beta, best) {
            (true, Some(b)) => b.score,
            _ => f64::NEG_INFINITY,
        };
        let score = minimax.node(&board, 1, false, ai.other(), Some(pos), alpha, f64::INFINITY);

        if minimax.stats.budget_exhausted {
            // Cut short inside this move: only usable if nothing else completed
            if pos == first {
                fallback_score = score;
            }
            break;
        }
        if best.is_none_or(|b| score > b.score) {
            best = Some(BestMove {
                position: pos,
                score,
            });
        }
    }

    let best = best.unwrap_or(BestMove {
        position: first,
        score: fallback_score,
    });
    let stats = minimax.stats();

    debug!(
        col = best.position.col,
        row = best.position.row,
        score = best.score,
        nodes = stats.nodes_visited,
        cutoffs = stats.cutoffs,
        budget_exhausted = stats.budget_exhausted,
        "search complete"
    );

    Ok(SearchOutcome { best, stats })
}

/// Minimax agent driven by difficulty settings.
pub struct MinimaxAgent {
    settings: EvaluationSettings,
    search: SearchConfig,
    evaluator: Box<dyn Evaluator>,
    last_stats: Option<SearchStats>,
}

impl MinimaxAgent {
    pub fn new(settings: EvaluationSettings, search: SearchConfig) -> Self {
        Self::with_evaluator(settings, search, Box::new(WeightedHeuristic))
    }

    pub fn with_evaluator(
        settings: EvaluationSettings,
        search: SearchConfig,
        evaluator: Box<dyn Evaluator>,
    ) -> Self {
        MinimaxAgent {
            settings,
            search,
            evaluator,
            last_stats: None,
        }
    }

    /// Full search result including the score.
    pub fn search(&mut self, state: &GameState) -> Result<SearchOutcome, SearchError> {
        let outcome = choose_move(
            state,
            self.evaluator.as_ref(),
            self.settings.config(),
            &self.search,
        )?;
        self.last_stats = Some(outcome.stats);
        Ok(outcome)
    }
}

impl Agent for MinimaxAgent {
    fn select_move(&mut self, state: &GameState) -> Result<Position, SearchError> {
        Ok(self.search(state)?.best.position)
    }

    fn name(&self) -> &str {
        "Minimax"
    }

    fn last_stats(&self) -> Option<SearchStats> {
        self.last_stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::evaluation::Difficulty;
    use crate::ai::RandomAgent;
    use crate::error::ConfigError;
    use crate::game::GameStatus;

    /// Scores every position as zero.
    struct ZeroEvaluator;

    impl Evaluator for ZeroEvaluator {
        fn evaluate(
            &self,
            _board: &Board,
            _last_move: Option<Position>,
            _ai_player: Player,
            _win_condition: usize,
            _config: &EvaluationConfig,
        ) -> Evaluation {
            Evaluation::Heuristic(0.0)
        }
    }

    /// Scores a position by the column of the last move.
    struct LastColumnEvaluator;

    impl Evaluator for LastColumnEvaluator {
        fn evaluate(
            &self,
            _board: &Board,
            last_move: Option<Position>,
            _ai_player: Player,
            _win_condition: usize,
            _config: &EvaluationConfig,
        ) -> Evaluation {
            Evaluation::Heuristic(last_move.map_or(0.0, |p| p.col as f64))
        }
    }

    /// Scores 1.0 once the AI holds the bottom cell of column 1.
    struct BottomOfColumnOneEvaluator;

    impl Evaluator for BottomOfColumnOneEvaluator {
        fn evaluate(
            &self,
            board: &Board,
            _last_move: Option<Position>,
            ai_player: Player,
            _win_condition: usize,
            _config: &EvaluationConfig,
        ) -> Evaluation {
            let held = board.get(board.rows() - 1, 1) == ai_player.to_cell();
            Evaluation::Heuristic(if held { 1.0 } else { 0.0 })
        }
    }

    fn play(columns: &[usize]) -> GameState {
        columns
            .iter()
            .fold(GameState::initial(), |state, &col| state.apply_move(col).unwrap())
    }

    fn best(state: &GameState, search: SearchConfig) -> SearchOutcome {
        choose_move(state, &WeightedHeuristic, &EvaluationConfig::default(), &search).unwrap()
    }

    fn plain() -> SearchConfig {
        SearchConfig {
            alpha_beta: false,
            ..SearchConfig::default()
        }
    }

    // --- Tie-break and determinism ---

    #[test]
    fn zero_evaluator_picks_leftmost_column() {
        let outcome = choose_move(
            &GameState::initial(),
            &ZeroEvaluator,
            &EvaluationConfig::default(),
            &plain(),
        )
        .unwrap();
        assert_eq!(outcome.best.position.col, 0);
        assert_eq!(outcome.best.score, 0.0);

        // Column 0 full: next column to the right
        let state = play(&[0, 0, 0, 0, 0, 0]);
        let outcome = choose_move(
            &state,
            &ZeroEvaluator,
            &EvaluationConfig::default(),
            &SearchConfig::default(),
        )
        .unwrap();
        assert_eq!(outcome.best.position.col, 1);
    }

    #[test]
    fn node_count_is_columns_to_the_depth() {
        let outcome = choose_move(
            &GameState::initial(),
            &ZeroEvaluator,
            &EvaluationConfig::default(),
            &plain(),
        )
        .unwrap();
        assert_eq!(outcome.stats.nodes_visited, 7 + 49 + 343);
        assert_eq!(outcome.stats.cutoffs, 0);
        assert!(!outcome.stats.budget_exhausted);
    }

    #[test]
    fn search_is_repeatable() {
        let state = play(&[3, 3, 2, 4]);
        let a = best(&state, SearchConfig::default());
        let b = best(&state, SearchConfig::default());
        assert_eq!(a, b);
    }

    // --- Tactics ---

    #[test]
    fn takes_winning_move() {
        // Player 1 holds the bottom of columns 0..3, Player 2 sits on top
        let state = play(&[0, 0, 1, 1, 2, 2]);
        assert_eq!(state.current_player(), Player::One);

        for search in [SearchConfig::default(), plain()] {
            let outcome = best(&state, search);
            assert_eq!(outcome.best.position, Position::new(5, 3));
            // Win one ply down, two plies short of the depth limit
            let bound = EvaluationConfig::default().heuristic_bound(6, 7, 4);
            assert_eq!(outcome.best.score, 100_000.0 + bound + 1.0 + 2.0);
        }
    }

    #[test]
    fn blocks_opponent_win() {
        // Player 2 has [0, 1, 2] on the bottom row; Player 1 has no win
        let state = play(&[6, 0, 6, 1, 5, 2]);
        assert_eq!(state.current_player(), Player::One);

        let outcome = best(&state, SearchConfig::default());
        assert_eq!(outcome.best.position.col, 3, "should block at column 3");
        assert!(outcome.best.score > -50_000.0);
    }

    #[test]
    fn prefers_win_over_block() {
        // Both players threaten column 3; Player 1 is to move
        let state = play(&[0, 0, 1, 1, 2, 2]);
        let outcome = best(&state, SearchConfig::default());
        assert_eq!(outcome.best.position.col, 3);
        assert!(outcome.best.score > 0.0);
    }

    #[test]
    fn plays_as_second_player() {
        // Player 1 threatens column 3 on the bottom row; Player 2 must block
        let state = play(&[0, 6, 1, 6, 2]);
        assert_eq!(state.current_player(), Player::Two);
        let outcome = best(&state, SearchConfig::default());
        assert_eq!(outcome.best.position.col, 3);
    }

    // --- Alpha-beta equivalence ---

    #[test]
    fn alpha_beta_matches_plain_minimax() {
        let mut rng_agent = RandomAgent::with_seed(11);
        let mut checked = 0;
        for _ in 0..12 {
            let mut state = GameState::initial();
            for _ in 0..8 {
                if state.is_terminal() {
                    break;
                }
                let pos = rng_agent.select_move(&state).unwrap();
                state = state.apply_move(pos.col).unwrap();
            }
            if state.is_terminal() {
                continue;
            }

            let pruned = best(&state, SearchConfig::default());
            let full = best(&state, plain());
            assert_eq!(pruned.best, full.best, "state: {state:?}");
            assert!(pruned.stats.nodes_visited <= full.stats.nodes_visited);
            checked += 1;
        }
        assert!(checked > 0);
    }

    #[test]
    fn alpha_beta_prunes_on_open_board() {
        let pruned = best(&GameState::initial(), SearchConfig::default());
        let full = best(&GameState::initial(), plain());
        assert_eq!(pruned.best, full.best);
        assert!(pruned.stats.cutoffs > 0);
        assert!(pruned.stats.nodes_visited < full.stats.nodes_visited);
    }

    // --- Alternation ---

    #[test]
    fn strict_alternation_maximizes_on_ai_plies() {
        let outcome = choose_move(
            &GameState::initial(),
            &LastColumnEvaluator,
            &EvaluationConfig::default(),
            &plain(),
        )
        .unwrap();
        // The AI's third-ply reply always picks the rightmost column
        assert_eq!(outcome.best.score, 6.0);
        assert_eq!(outcome.best.position.col, 0);
    }

    #[test]
    fn legacy_alternation_minimizes_below_root() {
        let search = SearchConfig {
            alternation: Alternation::MinimizeBelowRoot,
            ..plain()
        };
        let outcome = choose_move(
            &GameState::initial(),
            &LastColumnEvaluator,
            &EvaluationConfig::default(),
            &search,
        )
        .unwrap();
        assert_eq!(outcome.best.score, 0.0);
    }

    #[test]
    fn legacy_alternation_still_finds_immediate_tactics() {
        let search = SearchConfig {
            alternation: Alternation::MinimizeBelowRoot,
            ..SearchConfig::default()
        };
        assert_eq!(best(&play(&[0, 0, 1, 1, 2, 2]), search).best.position.col, 3);
        assert_eq!(best(&play(&[6, 0, 6, 1, 5, 2]), search).best.position.col, 3);
    }

    #[test]
    fn minimax_value_on_full_board_is_neutral() {
        let board = Board::from_rows(&["12", "21"]);
        let config = EvaluationConfig::default();
        let mut minimax = Minimax::new(&ZeroEvaluator, &config, Player::One, 4, plain());
        assert_eq!(minimax.value(&board, 1, true, Player::One, None), 0.0);
        assert_eq!(minimax.stats().nodes_visited, 1);
    }

    #[test]
    fn decisive_scores_short_circuit() {
        let board = Board::from_rows(&[
            ".......",
            ".......",
            ".......",
            ".......",
            "222....",
            "1111...",
        ]);
        let config = EvaluationConfig::default();
        let mut minimax = Minimax::new(&WeightedHeuristic, &config, Player::One, 4, plain());
        let score = minimax.value(&board, 2, false, Player::Two, Some(Position::new(5, 3)));
        assert_eq!(score, 100_000.0 + config.heuristic_bound(6, 7, 4) + 1.0 + 1.0);
        assert_eq!(minimax.stats().nodes_visited, 1, "no children explored");
    }

    #[test]
    fn decisive_scores_keep_their_sign_with_small_weights() {
        let mut config = EvaluationConfig::default();
        config.terminal.win = 2.0;
        config.terminal.loss = 2.0;
        config.positional.center_column = 1.0;
        config.positional.center_adjacent = 0.0;
        config.threats.open_three = 0.0;
        config.threats.open_two = 0.0;
        config.threats.opponent_open_three = 0.0;
        config.threats.opponent_open_two = 0.0;
        config.validate().unwrap();
        let bound = config.heuristic_bound(6, 7, 4);

        let board = Board::from_rows(&[
            ".......",
            ".......",
            ".......",
            ".......",
            "111....",
            "2222...",
        ]);
        let last = Some(Position::new(5, 3));
        let mut minimax = Minimax::new(&WeightedHeuristic, &config, Player::One, 4, plain());
        let loss = minimax.value(&board, 3, true, Player::One, last);
        assert!(loss < -bound, "loss scored {loss}");

        let mut minimax = Minimax::new(&WeightedHeuristic, &config, Player::Two, 4, plain());
        let win = minimax.value(&board, 3, false, Player::One, last);
        assert!(win > bound, "win scored {win}");
    }

    /// Playing `col` lets the opponent win on their next move.
    fn gives_away_win(state: &GameState, col: usize) -> bool {
        let next = state.apply_move(col).unwrap();
        !next.is_terminal()
            && next
                .legal_moves()
                .iter()
                .any(|p| next.apply_move(p.col).unwrap().winner().is_some())
    }

    #[test]
    fn small_terminal_weights_still_block_threats() {
        let mut config = EvaluationConfig::default();
        config.terminal.win = 3.0;
        config.terminal.loss = 3.0;
        config.positional.center_column = 2.0;
        config.positional.center_adjacent = 1.0;
        config.threats.open_three = 0.0;
        config.threats.open_two = 0.0;
        config.threats.opponent_open_three = 0.0;
        config.threats.opponent_open_two = 0.0;
        config.validate().unwrap();

        let mut random = RandomAgent::with_seed(3);
        let mut checked = 0;
        for game in 0..40 {
            let mut state = GameState::initial();
            for _ in 0..(6 + game % 14) {
                if state.is_terminal() {
                    break;
                }
                let pos = random.select_move(&state).unwrap();
                state = state.apply_move(pos.col).unwrap();
            }
            if state.is_terminal() {
                continue;
            }

            let safe: Vec<usize> = state
                .legal_moves()
                .iter()
                .map(|p| p.col)
                .filter(|&col| !gives_away_win(&state, col))
                .collect();
            let outcome =
                choose_move(&state, &WeightedHeuristic, &config, &SearchConfig::default()).unwrap();
            let col = outcome.best.position.col;
            assert!(
                safe.is_empty() || safe.contains(&col),
                "chose col {col} with safe columns {safe:?} in {state:?}"
            );
            checked += 1;
        }
        assert!(checked > 0);
    }

    // --- Budget and errors ---

    #[test]
    fn node_budget_is_never_exceeded() {
        // Many leaves here are decisive
        let state = play(&[0, 0, 1, 1, 2, 2]);
        for budget in 1..=80 {
            for alpha_beta in [true, false] {
                let search = SearchConfig {
                    node_budget: Some(budget),
                    alpha_beta,
                    ..SearchConfig::default()
                };
                let outcome = best(&state, search);
                assert!(
                    outcome.stats.nodes_visited <= budget,
                    "visited {} with budget {budget}",
                    outcome.stats.nodes_visited
                );
            }
        }
    }

    #[test]
    fn root_move_finishing_on_the_budget_is_kept() {
        // Each root move spans 1 + 7 + 49 nodes; the budget runs out exactly
        // as column 1 finishes
        let search = SearchConfig {
            node_budget: Some(114),
            ..plain()
        };
        let outcome = choose_move(
            &GameState::initial(),
            &BottomOfColumnOneEvaluator,
            &EvaluationConfig::default(),
            &search,
        )
        .unwrap();
        assert_eq!(outcome.stats.nodes_visited, 114);
        assert!(outcome.stats.budget_exhausted);
        assert_eq!(outcome.best.position.col, 1);
        assert_eq!(outcome.best.score, 1.0);
    }

    #[test]
    fn node_budget_returns_best_so_far() {
        let search = SearchConfig {
            node_budget: Some(60),
            ..plain()
        };
        let outcome = best(&GameState::initial(), search);
        assert!(outcome.stats.budget_exhausted);
        assert!(outcome.stats.nodes_visited <= 60);
        assert!(GameState::initial().legal_moves().contains(&outcome.best.position));
    }

    #[test]
    fn tiny_budget_falls_back_to_leftmost_move() {
        let search = SearchConfig {
            node_budget: Some(1),
            ..SearchConfig::default()
        };
        let state = play(&[0, 0, 0, 0, 0, 0]);
        let outcome = best(&state, search);
        assert!(outcome.stats.budget_exhausted);
        assert_eq!(outcome.best.position.col, 1);
    }

    #[test]
    fn invalid_config_fails_fast() {
        let mut config = EvaluationConfig::default();
        config.terminal.win = f64::INFINITY;
        let err = choose_move(&GameState::initial(), &WeightedHeuristic, &config, &plain())
            .unwrap_err();
        assert!(matches!(err, SearchError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn terminal_state_has_no_moves() {
        let state = play(&[0, 0, 1, 1, 2, 2, 3]);
        assert!(matches!(state.status(), GameStatus::Won(_)));
        let err = choose_move(
            &state,
            &WeightedHeuristic,
            &EvaluationConfig::default(),
            &plain(),
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::NoLegalMoves));
    }

    // --- Agent ---

    #[test]
    fn agent_records_stats() {
        let mut agent = MinimaxAgent::new(EvaluationSettings::default(), SearchConfig::default());
        assert!(agent.last_stats().is_none());
        let pos = agent.select_move(&GameState::initial()).unwrap();
        assert!(GameState::initial().legal_moves().contains(&pos));
        assert!(agent.last_stats().unwrap().nodes_visited > 0);
        assert_eq!(agent.name(), "Minimax");
    }

    #[test]
    fn full_game_vs_self_completes() {
        let search = SearchConfig::default();
        let mut one = MinimaxAgent::new(EvaluationSettings::new(Difficulty::Hard), search);
        let mut two = MinimaxAgent::new(EvaluationSettings::new(Difficulty::Easy), search);
        let mut state = GameState::initial();

        while !state.is_terminal() {
            let pos = match state.current_player() {
                Player::One => one.select_move(&state).unwrap(),
                Player::Two => two.select_move(&state).unwrap(),
            };
            state = state.apply_move(pos.col).unwrap();
        }
        assert!(state.is_terminal());
    }

    #[test]
    fn beats_random_agent() {
        let games_per_side = 10;
        let mut wins = 0;

        for (seed, ai_side) in (0..games_per_side * 2).map(|i| (i as u64, i % 2 == 0)) {
            let ai_player = if ai_side { Player::One } else { Player::Two };
            let mut ai = MinimaxAgent::new(EvaluationSettings::default(), SearchConfig::default());
            let mut random = RandomAgent::with_seed(seed);
            let mut state = GameState::initial();

            while !state.is_terminal() {
                let pos = if state.current_player() == ai_player {
                    ai.select_move(&state).unwrap()
                } else {
                    random.select_move(&state).unwrap()
                };
                state = state.apply_move(pos.col).unwrap();
            }

            if state.winner().is_some_and(|line| line.player == ai_player) {
                wins += 1;
            }
        }

        let total = games_per_side * 2;
        assert!(
            wins * 4 > total * 3,
            "minimax should beat random >75% of the time, got {wins}/{total}"
        );
    }
}
