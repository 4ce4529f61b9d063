//! Minimax search with alpha-beta pruning and a capture-only quiescence
//! extension.
//!
//! Scores are always from the bot's point of view: the bot's plies maximize,
//! the opponent's minimize. Every recursion entry polls the clock; once time
//! is up the node returns its static evaluation and reports `stopped`, and the
//! root throws that candidate away.

use std::cmp::Reverse;

use checkers_core::{
    apply_move, calculate_allowed_moves, has_capture, Board, Color, Move, SearchLimits,
    TimeControl,
};
use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::eval::evaluate_board;

/// Base score of a won position. Remaining depth is added on top so that
/// quicker wins (and slower losses) are preferred.
pub const WIN_SCORE: i32 = 100_000;
const INFINITY: i32 = i32::MAX / 2;

/// Result from pick_best_move indicating whether search completed or was stopped.
pub struct SearchOutcome {
    /// Best move found (if any legal moves exist)
    pub best_move: Option<(Move, i32)>,
    /// True if search was stopped early due to time
    pub stopped: bool,
    /// Nodes visited below the root
    pub nodes: u64,
}

/// Picks the bot's move.
///
/// A forced move is returned without searching. Otherwise the root moves are
/// shuffled, then stably ordered by capture length, and each is scored by
/// minimax with the opponent to move until the clock runs out. The first move
/// with the strictly highest score wins; if nothing was fully evaluated the
/// first move in capture-priority order is played.
pub fn pick_best_move(board: &Board, bot: Color, limits: &SearchLimits) -> SearchOutcome {
    let mut moves = calculate_allowed_moves(board, bot);

    if moves.len() <= 1 {
        return SearchOutcome {
            best_move: moves.pop().map(|mv| {
                let score = evaluate_board(&apply_move(board, &mv), bot);
                (mv, score)
            }),
            stopped: false,
            nodes: 0,
        };
    }

    moves.shuffle(&mut thread_rng());
    order_moves(&mut moves);

    limits.start();
    let mut search = Search::new(bot, limits.quiescence_depth, &limits.time_control);
    let mut best: Option<(usize, i32)> = None;
    let mut stopped = false;

    for (i, mv) in moves.iter().enumerate() {
        // Check time before starting each root move
        if search.tc.check_time() {
            stopped = true;
            break;
        }

        let alpha = best.map_or(-INFINITY, |(_, s)| s);
        let (score, was_stopped) =
            search.minimax(&apply_move(board, mv), limits.depth, alpha, INFINITY, false);

        if was_stopped {
            stopped = true;
            break;
        }

        if best.map_or(true, |(_, s)| score > s) {
            best = Some((i, score));
        }
    }

    let (idx, score) =
        best.unwrap_or_else(|| (0, evaluate_board(&apply_move(board, &moves[0]), bot)));

    tracing::debug!(
        ?bot,
        candidates = moves.len(),
        nodes = search.nodes,
        score,
        stopped,
        "root search finished"
    );

    SearchOutcome {
        best_move: Some((moves.swap_remove(idx), score)),
        stopped,
        nodes: search.nodes,
    }
}

/// Longest capture chains first. The sort is stable so earlier shuffling
/// still breaks ties.
pub fn order_moves(moves: &mut [Move]) {
    moves.sort_by_key(|mv| Reverse(mv.captures.len()));
}

/// What a child node searches next.
#[derive(Clone, Copy)]
enum Ply {
    Main(u8),
    Quiescence(u8),
}

pub(crate) struct Search<'a> {
    bot: Color,
    quiescence_depth: u8,
    tc: &'a TimeControl,
    pub(crate) nodes: u64,
}

impl<'a> Search<'a> {
    pub(crate) fn new(bot: Color, quiescence_depth: u8, tc: &'a TimeControl) -> Self {
        Self {
            bot,
            quiescence_depth,
            tc,
            nodes: 0,
        }
    }

    fn side_to_move(&self, maximizing: bool) -> Color {
        if maximizing {
            self.bot
        } else {
            self.bot.other()
        }
    }

    /// Returns (score, stopped) where stopped indicates the clock ran out.
    pub(crate) fn minimax(
        &mut self,
        board: &Board,
        depth: u8,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> (i32, bool) {
        self.nodes += 1;
        if self.tc.check_time() {
            return (evaluate_board(board, self.bot), true);
        }

        if depth == 0 {
            return self.quiescence(board, alpha, beta, maximizing, self.quiescence_depth);
        }

        let mut moves = calculate_allowed_moves(board, self.side_to_move(maximizing));
        if moves.is_empty() {
            return (terminal_score(maximizing, depth), false);
        }

        order_moves(&mut moves);
        self.search_moves(board, &moves, alpha, beta, maximizing, Ply::Main(depth - 1))
    }

    /// Capture-only extension past the horizon.
    ///
    /// Captures are compulsory, so a side that can capture has no option to
    /// stand pat: every capture is searched. Quiet positions and an exhausted
    /// extension budget return the static evaluation.
    pub(crate) fn quiescence(
        &mut self,
        board: &Board,
        alpha: i32,
        beta: i32,
        maximizing: bool,
        q_depth: u8,
    ) -> (i32, bool) {
        self.nodes += 1;
        let stand_pat = evaluate_board(board, self.bot);
        if self.tc.check_time() {
            return (stand_pat, true);
        }

        let side = self.side_to_move(maximizing);
        if q_depth == 0 || !has_capture(board, side) {
            return (stand_pat, false);
        }

        let mut moves = calculate_allowed_moves(board, side);
        order_moves(&mut moves);
        self.search_moves(board, &moves, alpha, beta, maximizing, Ply::Quiescence(q_depth - 1))
    }

    fn search_moves(
        &mut self,
        board: &Board,
        moves: &[Move],
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        next: Ply,
    ) -> (i32, bool) {
        let mut best = if maximizing { -INFINITY } else { INFINITY };

        for mv in moves {
            let child = apply_move(board, mv);
            let (score, stopped) = match next {
                Ply::Main(depth) => self.minimax(&child, depth, alpha, beta, !maximizing),
                Ply::Quiescence(q) => self.quiescence(&child, alpha, beta, !maximizing, q),
            };

            if stopped {
                return (score, true);
            }

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if beta <= alpha {
                break;
            }
        }

        (best, false)
    }
}

/// Score for a side to move with no legal moves, which loses.
fn terminal_score(maximizing: bool, depth: u8) -> i32 {
    let score = WIN_SCORE + depth as i32;
    if maximizing {
        -score
    } else {
        score
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
