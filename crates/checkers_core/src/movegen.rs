use crate::{board::Board, types::*};

/// Every legal move for `side`.
///
/// Capturing is mandatory: when any piece of `side` can jump, only complete
/// capture chains are returned and every simple move is discarded, including
/// those of pieces that cannot capture themselves. No ordering is guaranteed.
pub fn calculate_allowed_moves(board: &Board, side: Color) -> Vec<Move> {
    let mut captures = Vec::new();
    let mut simple = Vec::new();

    for (from, piece) in board.pieces(side) {
        let chains = capture_chains(board, from, piece);
        if chains.is_empty() {
            if captures.is_empty() {
                simple_moves_into(board, from, piece, &mut simple);
            }
        } else {
            captures.extend(chains);
        }
    }

    if captures.is_empty() { simple } else { captures }
}

/// True when `side` has at least one capture available.
pub fn has_capture(board: &Board, side: Color) -> bool {
    board.pieces(side).any(|(from, piece)| {
        DIAGONALS
            .iter()
            .any(|&dir| !jumps(board, from, from, piece, &[], dir).is_empty())
    })
}

/// Plays `mv` on a copy of `board`. The input is never touched.
pub fn apply_move(board: &Board, mv: &Move) -> Board {
    let mut next = *board;
    let Some(piece) = board.piece_at(mv.from) else {
        debug_assert!(false, "apply_move: no piece on {:?}", mv.from);
        return next;
    };

    next.set_piece(mv.from, None);
    next.set_piece(
        mv.to,
        Some(Piece {
            color: piece.color,
            is_king: piece.is_king || mv.becomes_king,
        }),
    );
    for &captured in &mv.captures {
        next.set_piece(captured, None);
    }
    next
}

/// Both sides are down to a single king each.
pub fn is_lone_king_draw(board: &Board) -> bool {
    Color::ALL
        .iter()
        .all(|&c| board.count(c) == 1 && board.kings(c) == 1)
}

fn simple_moves_into(board: &Board, from: Position, piece: Piece, out: &mut Vec<Move>) {
    if piece.is_king {
        for dir in DIAGONALS {
            let mut step = 1;
            while let Some(to) = from.offset(dir, step) {
                if !board.is_empty(to) {
                    break;
                }
                out.push(Move::simple(from, to, false));
                step += 1;
            }
        }
        return;
    }

    let forward = piece.color.forward();
    for dc in [-1, 1] {
        if let Some(to) = from.offset((forward, dc), 1) {
            if board.is_empty(to) {
                let crowned = to.row() == piece.color.promotion_row();
                out.push(Move::simple(from, to, crowned));
            }
        }
    }
}

fn capture_chains(board: &Board, from: Position, piece: Piece) -> Vec<Move> {
    extend_chain(board, from, from, piece, &[], &[])
}

/// Recursively extends a capture chain that started on `origin` and now
/// stands on `at`. Captured pieces stay on the board until the move is
/// applied, so they block later jumps but can never be taken twice. The
/// vacated `origin` counts as an empty square.
///
/// A chain is only emitted once it cannot continue.
fn extend_chain(
    board: &Board,
    origin: Position,
    at: Position,
    piece: Piece,
    captured: &[Position],
    path: &[Position],
) -> Vec<Move> {
    let mut moves = Vec::new();

    for dir in DIAGONALS {
        for (victim, landing) in jumps(board, origin, at, piece, captured, dir) {
            let mut captured = captured.to_vec();
            captured.push(victim);
            let mut path = path.to_vec();
            path.push(landing);

            // Crowning mid-capture takes effect immediately.
            let piece = Piece {
                color: piece.color,
                is_king: piece.is_king || landing.row() == piece.color.promotion_row(),
            };

            let continuations = extend_chain(board, origin, landing, piece, &captured, &path);
            if continuations.is_empty() {
                moves.push(Move {
                    from: origin,
                    to: landing,
                    captures: captured,
                    path,
                    becomes_king: piece.is_king,
                });
            } else {
                moves.extend(continuations);
            }
        }
    }

    moves
}

/// Single jumps from `at` along `dir` as (captured square, landing square).
fn jumps(
    board: &Board,
    origin: Position,
    at: Position,
    piece: Piece,
    captured: &[Position],
    dir: (i8, i8),
) -> Vec<(Position, Position)> {
    let is_open = |sq: Position| sq == origin || board.is_empty(sq);
    let is_target = |sq: Position| {
        sq != origin
            && !captured.contains(&sq)
            && board.piece_at(sq).is_some_and(|p| p.color != piece.color)
    };

    let mut out = Vec::new();

    if !piece.is_king {
        if let (Some(victim), Some(landing)) = (at.offset(dir, 1), at.offset(dir, 2)) {
            if is_target(victim) && is_open(landing) {
                out.push((victim, landing));
            }
        }
        return out;
    }

    // Flying king: slide to the first occupied square, which must be a fresh
    // enemy, then land on any open square beyond it.
    let mut step = 1;
    let victim = loop {
        match at.offset(dir, step) {
            None => return out,
            Some(sq) if is_open(sq) => step += 1,
            Some(sq) if is_target(sq) => break sq,
            Some(_) => return out,
        }
    };

    step += 1;
    while let Some(landing) = at.offset(dir, step) {
        if !is_open(landing) {
            break;
        }
        out.push((victim, landing));
        step += 1;
    }
    out
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
