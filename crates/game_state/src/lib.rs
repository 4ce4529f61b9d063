//! Replicated Draughts Game State
//!
//! Game records live in a transactional document store shared by every
//! client of a game. Clients compute moves off the snapshot they last saw
//! and commit them with that snapshot's `version`; the first committer
//! wins and everyone else is told to reload.
//!
//! ```ignore
//! let service = GameService::new(InMemoryStore::default(), GameConfig::default());
//! let game = service.create("alice", ColorChoice::White, None).await?;
//! let game = service.join(&game.id, "bob").await?;
//!
//! let mv = calculate_allowed_moves(&game.board, game.turn)[0].clone();
//! let commit = MoveCommit::prepare(&game, mv);
//! service.commit_move(&game.id, game.version, commit).await?;
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod record;
pub mod store;

pub use config::{ConfigError, GameConfig};
pub use error::{GameError, Result};
pub use protocol::{GameService, MoveCommit, Outcome};
pub use record::{
    ColorChoice, GameId, GameRecord, GameStatus, Metadata, PlayerId, Players, Snapshot,
    TakebackRequest,
};
pub use store::{GameStore, InMemoryStore, Subscription, Transaction};
