//! Error types for the game state protocol.
//!
//! Rule and search code never fails; everything here comes from talking to
//! the document store or from a request the current record rejects.

use checkers_core::{BoardError, Position};

/// Errors surfaced by [`GameService`](crate::GameService) and [`GameStore`](crate::GameStore).
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// No record under this id
    #[error("game not found: {game_id}")]
    NotFound { game_id: String },

    /// Both seats are taken by other players
    #[error("game {game_id} is full")]
    GameFull { game_id: String },

    /// Someone committed first. Reload the record and recompute.
    #[error("state changed: expected version {expected}, found {actual}; reload and retry")]
    VersionConflict { expected: u64, actual: u64 },

    /// The stored document does not decode into a game record
    #[error("malformed game state: {0}")]
    MalformedState(String),

    /// The game is not in a status that accepts this request
    #[error("game {game_id} does not accept this request in its current status")]
    NotActive { game_id: String },

    /// The move is not among the legal moves of the current position
    #[error("illegal move from {from:?} to {to:?}")]
    IllegalMove { from: Position, to: Position },

    /// The player holds neither seat
    #[error("player {player_id} is not part of game {game_id}")]
    NotParticipant { game_id: String, player_id: String },

    /// A record with this id is already stored
    #[error("game already exists: {game_id}")]
    AlreadyExists { game_id: String },

    /// The store kept losing the commit race
    #[error("transaction on {game_id} gave up after {attempts} attempts")]
    Contention { game_id: String, attempts: u32 },
}

impl GameError {
    pub(crate) fn not_found(game_id: &str) -> Self {
        GameError::NotFound {
            game_id: game_id.to_string(),
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::MalformedState(e.to_string())
    }
}

impl From<BoardError> for GameError {
    fn from(e: BoardError) -> Self {
        GameError::MalformedState(e.to_string())
    }
}

/// Result type alias for game state operations
pub type Result<T> = std::result::Result<T, GameError>;
