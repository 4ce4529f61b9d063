use crate::{
    board::Board,
    movegen::{apply_move, calculate_allowed_moves},
    types::Color,
};

/// Pure perft node count.
/// Counts all leaf positions reachable from `board` with `side` to move
/// after exactly `depth` plies. Positions with no moves contribute nothing.
pub fn perft(board: &Board, side: Color, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = calculate_allowed_moves(board, side);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|mv| perft(&apply_move(board, mv), side.other(), depth - 1))
        .sum()
}
