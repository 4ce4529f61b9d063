pub mod board;
pub mod movegen;
pub mod perft;
pub mod time_control;
pub mod types;

// Re-export core game logic (not engine-specific)
pub use board::*;
pub use movegen::*;
pub use perft::perft;
pub use time_control::*;
pub use types::*;

// =============================================================================
// Engine trait: implemented by all draughts bots (minimax, random, ...)
// =============================================================================

/// Result of a search operation
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The best move found (None if no legal moves)
    pub best_move: Option<Move>,
    /// Evaluation score from the engine's perspective
    pub score: i32,
    /// Nominal search depth
    pub depth: u8,
    /// Number of nodes searched (optional, for stats)
    pub nodes: u64,
    /// Whether search was stopped early due to time limit
    pub stopped: bool,
}

/// Trait that all draughts engines must implement.
///
/// Engines never fail: a side without legal moves yields `best_move: None`
/// and the caller decides what that means for the game.
pub trait Engine: Send {
    /// Search the position for `side` with the given search limits.
    fn search(&mut self, board: &Board, side: Color, limits: SearchLimits) -> SearchResult;

    /// Returns the engine's display name
    fn name(&self) -> &str;

    /// Reset internal state for a new game
    fn new_game(&mut self) {}
}
