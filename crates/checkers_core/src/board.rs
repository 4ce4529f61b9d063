use serde::{Deserialize, Serialize};

use crate::types::*;

/// Rows of the starting position held by each side.
const STARTING_ROWS: u8 = 3;

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("expected an 8x8 grid, found {rows} rows")]
    Rows { rows: usize },

    #[error("row {row} has {cells} cells, expected 8")]
    Cells { row: usize, cells: usize },

    #[error("piece on light square ({row}, {col})")]
    LightSquare { row: u8, col: u8 },

    #[error("invalid diagram: {0}")]
    Diagram(String),

    #[error("malformed board json: {0}")]
    Json(#[from] serde_json::Error),
}

/// 8x8 draughts board stored as a flat mailbox indexed by `row * 8 + col`.
///
/// Serializes to the canonical nested form: eight rows (row 0 first) of
/// eight cells, each `null` or `{"color": .., "isKing": ..}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<Option<Piece>>>", try_from = "Vec<Vec<Option<Piece>>>")]
pub struct Board {
    squares: [Option<Piece>; NUM_SQUARES],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            squares: [None; NUM_SQUARES],
        }
    }

    /// Standard starting position: twelve men per side on the dark squares of
    /// the three rows nearest their own back rank. Black holds rows 0..3.
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for pos in dark_squares() {
            if pos.row() < STARTING_ROWS {
                board.set_piece(pos, Some(Piece::man(Color::Black)));
            } else if pos.row() >= BOARD_SIZE - STARTING_ROWS {
                board.set_piece(pos, Some(Piece::man(Color::White)));
            }
        }
        board
    }

    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.squares[pos.index()]
    }

    pub fn set_piece(&mut self, pos: Position, piece: Option<Piece>) {
        debug_assert!(
            piece.is_none() || pos.is_dark(),
            "pieces only stand on dark squares"
        );
        self.squares[pos.index()] = piece;
    }

    pub fn is_empty(&self, pos: Position) -> bool {
        self.squares[pos.index()].is_none()
    }

    /// All occupied squares of `color` with their pieces, in index order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.squares.iter().enumerate().filter_map(move |(i, sq)| match sq {
            Some(pc) if pc.color == color => Position::from_index(i).map(|p| (p, *pc)),
            _ => None,
        })
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces(color).count()
    }

    pub fn kings(&self, color: Color) -> usize {
        self.pieces(color).filter(|(_, pc)| pc.is_king).count()
    }

    pub fn to_json(&self) -> String {
        // Serializing plain data into a String cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a text diagram, row 0 first: `w`/`b` for men, `W`/`B` for kings,
    /// and `.` or `-` for empty squares. Surrounding whitespace is ignored.
    pub fn from_diagram(diagram: &str) -> Result<Self, BoardError> {
        let rows: Vec<&str> = diagram
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if rows.len() != BOARD_SIZE as usize {
            return Err(BoardError::Rows { rows: rows.len() });
        }

        let mut board = Self::empty();
        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.chars().collect();
            if cells.len() != BOARD_SIZE as usize {
                return Err(BoardError::Cells {
                    row,
                    cells: cells.len(),
                });
            }
            for (col, ch) in cells.into_iter().enumerate() {
                let piece = match ch {
                    '.' | '-' => None,
                    'w' => Some(Piece::man(Color::White)),
                    'W' => Some(Piece::king(Color::White)),
                    'b' => Some(Piece::man(Color::Black)),
                    'B' => Some(Piece::king(Color::Black)),
                    other => {
                        return Err(BoardError::Diagram(format!(
                            "unexpected '{other}' at ({row}, {col})"
                        )));
                    }
                };
                let pos = Position::new(row as u8, col as u8);
                if piece.is_some() && !pos.is_dark() {
                    return Err(BoardError::LightSquare {
                        row: row as u8,
                        col: col as u8,
                    });
                }
                board.set_piece(pos, piece);
            }
        }
        Ok(board)
    }

    pub fn to_diagram(&self) -> String {
        let mut out = String::with_capacity(NUM_SQUARES + BOARD_SIZE as usize);
        for (i, sq) in self.squares.iter().enumerate() {
            out.push(match sq {
                None => '.',
                Some(Piece {
                    color: Color::White,
                    is_king,
                }) => {
                    if *is_king {
                        'W'
                    } else {
                        'w'
                    }
                }
                Some(Piece {
                    color: Color::Black,
                    is_king,
                }) => {
                    if *is_king {
                        'B'
                    } else {
                        'b'
                    }
                }
            });
            if i % BOARD_SIZE as usize == BOARD_SIZE as usize - 1 {
                out.push('\n');
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl From<Board> for Vec<Vec<Option<Piece>>> {
    fn from(board: Board) -> Self {
        board
            .squares
            .chunks(BOARD_SIZE as usize)
            .map(|row| row.to_vec())
            .collect()
    }
}

impl TryFrom<Vec<Vec<Option<Piece>>>> for Board {
    type Error = BoardError;

    fn try_from(grid: Vec<Vec<Option<Piece>>>) -> Result<Self, Self::Error> {
        if grid.len() != BOARD_SIZE as usize {
            return Err(BoardError::Rows { rows: grid.len() });
        }
        let mut board = Board::empty();
        for (row, cells) in grid.into_iter().enumerate() {
            if cells.len() != BOARD_SIZE as usize {
                return Err(BoardError::Cells {
                    row,
                    cells: cells.len(),
                });
            }
            for (col, piece) in cells.into_iter().enumerate() {
                let pos = Position::new(row as u8, col as u8);
                if piece.is_some() && !pos.is_dark() {
                    return Err(BoardError::LightSquare {
                        row: row as u8,
                        col: col as u8,
                    });
                }
                board.squares[pos.index()] = piece;
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
