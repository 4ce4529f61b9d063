//! Rule invariants checked over many pseudo-random games.
//!
//! Games are driven by a seeded `StdRng` so failures reproduce.

use checkers_core::{
    apply_move, calculate_allowed_moves, has_capture, is_lone_king_draw, Board, Color, Move,
    Position,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

fn play_random_game(seed: u64, max_plies: usize, mut check: impl FnMut(&Board, Color, &[Move])) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::initial();
    let mut side = Color::White;

    for _ in 0..max_plies {
        let moves = calculate_allowed_moves(&board, side);
        check(&board, side, &moves);
        if is_lone_king_draw(&board) {
            break;
        }
        let Some(mv) = moves.choose(&mut rng) else {
            break;
        };
        board = apply_move(&board, mv);
        side = side.other();
    }
}

#[test]
fn mandatory_capture_never_offers_simple_moves() {
    for seed in 0..40 {
        play_random_game(seed, 150, |board, side, moves| {
            if has_capture(board, side) {
                assert!(!moves.is_empty());
                assert!(
                    moves.iter().all(Move::is_capture),
                    "simple move offered while a capture exists:\n{}",
                    board.to_diagram()
                );
            } else {
                assert!(moves.iter().all(|m| !m.is_capture()));
            }
        });
    }
}

#[test]
fn capture_chains_never_take_a_piece_twice() {
    for seed in 100..140 {
        play_random_game(seed, 150, |board, side, moves| {
            for mv in moves {
                let mut seen: Vec<Position> = Vec::new();
                for c in &mv.captures {
                    assert!(!seen.contains(c), "double capture in {mv:?}");
                    seen.push(*c);
                    let victim = board.piece_at(*c).expect("captured square holds a piece");
                    assert_eq!(victim.color, side.other());
                }
                assert_eq!(mv.path.last(), Some(&mv.to));
                if mv.is_capture() {
                    assert_eq!(mv.path.len(), mv.captures.len());
                } else {
                    assert_eq!(mv.path.len(), 1);
                }
            }
        });
    }
}

#[test]
fn apply_move_is_pure_and_lands_the_piece() {
    for seed in 200..230 {
        play_random_game(seed, 150, |board, side, moves| {
            let snapshot = *board;
            for mv in moves {
                let next = apply_move(board, mv);
                assert_eq!(*board, snapshot, "apply_move mutated its input");

                let landed = next.piece_at(mv.to).expect("piece on destination");
                assert_eq!(landed.color, side);
                let was_king = board.piece_at(mv.from).map(|p| p.is_king).unwrap_or(false);
                assert_eq!(landed.is_king, was_king || mv.becomes_king);
                assert_eq!(
                    next.count(side.other()),
                    board.count(side.other()) - mv.captures.len()
                );

                // The destination is now occupied, so no follow-up move of the
                // opponent may land there.
                for reply in calculate_allowed_moves(&next, side.other()) {
                    assert_ne!(reply.to, mv.to);
                }
            }
        });
    }
}

#[test]
fn men_crown_only_on_the_far_row() {
    for seed in 300..330 {
        play_random_game(seed, 200, |board, side, moves| {
            for mv in moves {
                let piece = board.piece_at(mv.from).expect("mover exists");
                if !mv.is_capture() {
                    if piece.is_king {
                        assert!(!mv.becomes_king, "king crowned by simple move");
                    } else {
                        assert_eq!(mv.becomes_king, mv.to.row() == side.promotion_row());
                    }
                } else if !piece.is_king && mv.becomes_king {
                    assert!(mv.path.iter().any(|p| p.row() == side.promotion_row()));
                }
            }
        });
    }
}

#[test]
fn pieces_stay_on_dark_squares() {
    for seed in 400..420 {
        play_random_game(seed, 200, |board, _, _| {
            for color in Color::ALL {
                for (pos, _) in board.pieces(color) {
                    assert!(pos.is_dark());
                }
            }
        });
    }
}
