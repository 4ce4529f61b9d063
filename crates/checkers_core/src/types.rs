use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: u8 = 8;
pub const NUM_SQUARES: usize = 64;

/// The four diagonal directions as (row delta, col delta).
pub const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Row delta of a forward step. White starts at the bottom (rows 5..7)
    /// and moves toward row 0.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row on which a man of this color is crowned.
    pub fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => BOARD_SIZE - 1,
        }
    }

    /// This color's own back rank.
    pub fn home_row(self) -> u8 {
        self.other().promotion_row()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub color: Color,
    pub is_king: bool,
}

impl Piece {
    pub fn man(color: Color) -> Self {
        Self {
            color,
            is_king: false,
        }
    }

    pub fn king(color: Color) -> Self {
        Self {
            color,
            is_king: true,
        }
    }
}

/// A square on the 8x8 board. Out-of-range coordinates cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

#[derive(Deserialize)]
struct RawPosition {
    row: u8,
    col: u8,
}

impl TryFrom<RawPosition> for Position {
    type Error = String;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::try_new(raw.row, raw.col)
            .ok_or_else(|| format!("position ({}, {}) is off the board", raw.row, raw.col))
    }
}

impl Position {
    /// Panics when the coordinates are off the board.
    pub fn new(row: u8, col: u8) -> Self {
        Self::try_new(row, col)
            .unwrap_or_else(|| panic!("position ({row}, {col}) is off the board"))
    }

    pub fn try_new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        if idx < NUM_SQUARES {
            Some(Self {
                row: (idx / BOARD_SIZE as usize) as u8,
                col: (idx % BOARD_SIZE as usize) as u8,
            })
        } else {
            None
        }
    }

    pub fn row(self) -> u8 {
        self.row
    }

    pub fn col(self) -> u8 {
        self.col
    }

    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE as usize + self.col as usize
    }

    /// Dark squares are the only ones pieces may stand on.
    pub fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// The square `steps` diagonal steps away, if it is still on the board.
    pub fn offset(self, (dr, dc): (i8, i8), steps: i8) -> Option<Position> {
        let row = self.row as i8 + dr * steps;
        let col = self.col as i8 + dc * steps;
        if (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }
}

/// A fully described transition: simple step or complete capture chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub from: Position,
    pub to: Position,
    /// Captured squares in the order they were jumped.
    pub captures: Vec<Position>,
    /// Every landing square after `from`, ending with `to`.
    pub path: Vec<Position>,
    pub becomes_king: bool,
}

impl Move {
    pub fn simple(from: Position, to: Position, becomes_king: bool) -> Self {
        Self {
            from,
            to,
            captures: Vec::new(),
            path: vec![to],
            becomes_king,
        }
    }

    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }
}

/// Dark squares only, in index order.
pub fn dark_squares() -> impl Iterator<Item = Position> {
    (0..NUM_SQUARES)
        .filter_map(Position::from_index)
        .filter(|p| p.is_dark())
}
