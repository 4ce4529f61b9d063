//! Random Move Draughts Engine
//!
//! Picks uniformly among the legal moves. Mandatory capture still applies,
//! since the candidates come straight from the rule engine.
//! Used as the "easy" bot and as a sparring partner in tests.

use checkers_core::{calculate_allowed_moves, Board, Color, Engine, Move, SearchLimits, SearchResult};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};


/// A draughts engine that plays random legal moves.
#[derive(Debug, Clone, Default)]
pub struct RandomEngine {
    nodes: u64,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self { nodes: 0 }
    }
}

impl Engine for RandomEngine {
    fn search(&mut self, board: &Board, side: Color, _limits: SearchLimits) -> SearchResult {
        self.nodes = 1;

        SearchResult {
            best_move: random_move_with(board, side, &mut thread_rng()),
            score: 0,
            depth: 1,
            nodes: self.nodes,
            stopped: false,
        }
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }

    fn new_game(&mut self) {
        self.nodes = 0;
    }
}

/// A uniformly random legal move for `side`, or `None` when it is stuck.
pub fn get_random_bot_move(board: &Board, side: Color) -> Option<Move> {
    random_move_with(board, side, &mut thread_rng())
}

/// Same as [`get_random_bot_move`] with a caller-supplied generator, so
/// games can be replayed from a seed.
pub fn random_move_with<R: Rng + ?Sized>(board: &Board, side: Color, rng: &mut R) -> Option<Move> {
    calculate_allowed_moves(board, side).choose(rng).cloned()
}
