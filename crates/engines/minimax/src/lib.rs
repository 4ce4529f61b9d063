//! Minimax Draughts Engine
//!
//! Alpha-beta minimax with a capture-only quiescence extension.
//! This is the "smart" bot offered to players.

mod eval;
mod search;

use checkers_core::{Board, Color, Engine, Move, SearchLimits, SearchResult};

pub use eval::evaluate_board;
pub use search::{order_moves, pick_best_move, SearchOutcome, WIN_SCORE};

/// Draughts engine using minimax with alpha-beta pruning.
///
/// This engine uses:
/// - Minimax search from the bot's perspective with alpha-beta pruning
/// - Quiescence search over forced capture lines past the horizon
/// - Material, center, advancement and back-row evaluation
/// - A soft wall-clock budget polled at every node
#[derive(Debug, Clone, Default)]
pub struct MinimaxEngine {
    /// Node counter for statistics
    nodes: u64,
}

impl MinimaxEngine {
    pub fn new() -> Self {
        Self { nodes: 0 }
    }
}

impl Engine for MinimaxEngine {
    fn search(&mut self, board: &Board, side: Color, limits: SearchLimits) -> SearchResult {
        let outcome = pick_best_move(board, side, &limits);
        self.nodes = outcome.nodes;

        SearchResult {
            score: outcome.best_move.as_ref().map(|(_, s)| *s).unwrap_or(0),
            best_move: outcome.best_move.map(|(mv, _)| mv),
            depth: limits.depth,
            nodes: self.nodes,
            stopped: outcome.stopped,
        }
    }

    fn name(&self) -> &str {
        "Minimax v1.0"
    }

    fn new_game(&mut self) {
        self.nodes = 0;
    }
}

/// The bot's move with the default limits, or `None` when it has no legal
/// move (the caller treats that as a loss).
pub fn get_smart_bot_move(board: &Board, bot: Color) -> Option<Move> {
    get_smart_bot_move_with(board, bot, &SearchLimits::default())
}

/// Same as [`get_smart_bot_move`] with explicit limits. The limits' clock is
/// restarted.
pub fn get_smart_bot_move_with(board: &Board, bot: Color, limits: &SearchLimits) -> Option<Move> {
    pick_best_move(board, bot, limits).best_move.map(|(mv, _)| mv)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod lib_tests;
