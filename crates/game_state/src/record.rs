//! The stored game document.
//!
//! Field names follow the wire format shared with other clients: camelCase
//! keys, SCREAMING_CASE enum values and the board as nested 8x8 arrays.

use chrono::{DateTime, Utc};
use checkers_core::{Board, Color, Move};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub type GameId = String;
pub type PlayerId = String;

// =============================================================================
// Lifecycle
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// One seat filled, waiting for an opponent
    Waiting,
    Active,
    /// Decided; `winner` is set
    Finished,
    Draw,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Finished | GameStatus::Draw)
    }
}

/// Seat preference when creating a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorChoice {
    White,
    Black,
    Random,
}

impl ColorChoice {
    /// The concrete seat. `Random` is decided here, once.
    pub fn resolve(self) -> Color {
        match self {
            ColorChoice::White => Color::White,
            ColorChoice::Black => Color::Black,
            ColorChoice::Random => {
                if rand::random() {
                    Color::White
                } else {
                    Color::Black
                }
            }
        }
    }

    pub fn is_random(self) -> bool {
        self == ColorChoice::Random
    }
}

impl From<Color> for ColorChoice {
    fn from(color: Color) -> Self {
        match color {
            Color::White => ColorChoice::White,
            Color::Black => ColorChoice::Black,
        }
    }
}

// =============================================================================
// Record parts
// =============================================================================

/// Seat assignment. A player id occupies at most one seat.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Players {
    pub white: Option<PlayerId>,
    pub black: Option<PlayerId>,
}

impl Players {
    pub fn seated(color: Color, player_id: &str) -> Self {
        let mut players = Players::default();
        *players.seat_mut(color) = Some(player_id.to_string());
        players
    }

    pub fn get(&self, color: Color) -> Option<&str> {
        match color {
            Color::White => self.white.as_deref(),
            Color::Black => self.black.as_deref(),
        }
    }

    pub(crate) fn seat_mut(&mut self, color: Color) -> &mut Option<PlayerId> {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }

    /// The seat `player_id` holds, if any.
    pub fn color_of(&self, player_id: &str) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&c| self.get(c) == Some(player_id))
    }

    /// First empty seat, white before black.
    pub fn open_seat(&self) -> Option<Color> {
        Color::ALL.into_iter().find(|&c| self.get(c).is_none())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Display only: the creator asked for a random seat.
    pub is_random_color: bool,
}

/// Everything a takeback restores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub board: Board,
    pub turn: Color,
    pub half_move_clock: u32,
    pub last_move: Option<Move>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakebackRequest {
    pub requester_id: PlayerId,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// GameRecord
// =============================================================================

/// One game as held by the document store.
///
/// `version` is the optimistic lock: every committed mutation bumps it and
/// version-checked writers compare it before writing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: GameId,
    pub board: Board,
    pub turn: Color,
    pub players: Players,
    pub status: GameStatus,
    pub winner: Option<Color>,
    pub version: u64,
    pub half_move_clock: u32,
    pub last_move: Option<Move>,
    pub created_at: DateTime<Utc>,
    pub expire_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Metadata,
    /// State right before the latest move; one level of undo.
    pub previous_state: Option<Snapshot>,
    pub takeback_request: Option<TakebackRequest>,
    /// Successor game created by a rematch
    pub rematch_id: Option<GameId>,
}

impl GameRecord {
    /// A fresh WAITING record with `creator` seated on `color`. White moves
    /// first.
    pub fn new(
        id: GameId,
        creator: &str,
        color: Color,
        is_random_color: bool,
        board: Board,
        now: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            id,
            board,
            turn: Color::White,
            players: Players::seated(color, creator),
            status: GameStatus::Waiting,
            winner: None,
            version: 0,
            half_move_clock: 0,
            last_move: None,
            created_at: now,
            expire_at: now + ttl,
            metadata: Metadata { is_random_color },
            previous_state: None,
            takeback_request: None,
            rematch_id: None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            turn: self.turn,
            half_move_clock: self.half_move_clock,
            last_move: self.last_move.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        self.board = snapshot.board;
        self.turn = snapshot.turn;
        self.half_move_clock = snapshot.half_move_clock;
        self.last_move = snapshot.last_move;
    }

    pub fn is_participant(&self, player_id: &str) -> bool {
        self.players.color_of(player_id).is_some()
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decodes a stored document. Any shape or board error is MalformedState.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod record_tests;
