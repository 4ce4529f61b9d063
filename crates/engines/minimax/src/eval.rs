//! Static position evaluation.

use checkers_core::{Board, Color, Piece, Position};

pub const MAN_VALUE: i32 = 100;
pub const KING_VALUE: i32 = 300;
pub const CENTER_BONUS: i32 = 10;
/// Per row travelled away from the home row (men only).
pub const ADVANCE_BONUS: i32 = 5;
pub const BACK_ROW_BONUS: i32 = 15;

/// Evaluates `board` from `perspective`'s point of view.
///
/// Every piece is worth its material value plus a bonus for standing in the
/// central 4x4 block, an advancement bonus for men and a bonus for men still
/// guarding their own back row. Own pieces add, enemy pieces subtract, so
/// `evaluate_board(b, c) == -evaluate_board(b, c.other())`.
pub fn evaluate_board(board: &Board, perspective: Color) -> i32 {
    let mut score = 0i32;
    for color in Color::ALL {
        let sign = if color == perspective { 1 } else { -1 };
        for (pos, piece) in board.pieces(color) {
            score += sign * piece_value(pos, piece);
        }
    }
    score
}

fn piece_value(pos: Position, piece: Piece) -> i32 {
    let mut value = if piece.is_king { KING_VALUE } else { MAN_VALUE };

    if (2..=5).contains(&pos.row()) && (2..=5).contains(&pos.col()) {
        value += CENTER_BONUS;
    }

    if !piece.is_king {
        let home = piece.color.home_row() as i32;
        value += ADVANCE_BONUS * (pos.row() as i32 - home).abs();

        if pos.row() == piece.color.home_row() {
            value += BACK_ROW_BONUS;
        }
    }

    value
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
