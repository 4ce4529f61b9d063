//! Game lifecycle operations on top of a [`GameStore`].
//!
//! Every mutation runs as a store transaction against the freshly read
//! record. Moves and outcome declarations are additionally guarded by the
//! caller's last-seen `version`: a mismatch is reported as
//! [`GameError::VersionConflict`] and never retried here, since the caller
//! has to recompute its move against the new position.

use chrono::Utc;
use checkers_core::{apply_move, calculate_allowed_moves, is_lone_king_draw, Board, Color, Move};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::record::{ColorChoice, GameId, GameRecord, GameStatus, TakebackRequest};
use crate::store::{GameStore, Subscription};

// =============================================================================
// Move commitment
// =============================================================================

/// A move together with the outcome the mover computed for it.
///
/// Built off a snapshot the caller already holds, outside any transaction.
/// [`GameService::commit_move`] only accepts it if that snapshot is still
/// current.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveCommit {
    pub mv: Move,
    pub next_turn: Color,
    pub status: GameStatus,
    pub winner: Option<Color>,
    /// The move captured or moved a man, so the half-move clock restarts.
    pub resets_clock: bool,
}

impl MoveCommit {
    /// Works out what `mv` does to the game in `record`.
    ///
    /// The opponent left without replies loses; two lone kings draw.
    pub fn prepare(record: &GameRecord, mv: Move) -> Self {
        let mover = record.turn;
        let after = apply_move(&record.board, &mv);

        let moved_man = record.board.piece_at(mv.from).is_some_and(|p| !p.is_king);
        let resets_clock = mv.is_capture() || moved_man;

        let (status, winner) = if calculate_allowed_moves(&after, mover.other()).is_empty() {
            (GameStatus::Finished, Some(mover))
        } else if is_lone_king_draw(&after) {
            (GameStatus::Draw, None)
        } else {
            (GameStatus::Active, None)
        };

        Self {
            mv,
            next_turn: mover.other(),
            status,
            winner,
            resets_clock,
        }
    }
}

/// Result reported by a client that detected the end of the game itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win(Color),
    Draw,
}

fn check_version(record: &GameRecord, expected: u64) -> Result<()> {
    if record.version != expected {
        warn!(
            game_id = %record.id,
            expected,
            actual = record.version,
            "stale write rejected"
        );
        return Err(GameError::VersionConflict {
            expected,
            actual: record.version,
        });
    }
    Ok(())
}

fn check_active(record: &GameRecord) -> Result<()> {
    if record.status != GameStatus::Active {
        return Err(GameError::NotActive {
            game_id: record.id.clone(),
        });
    }
    Ok(())
}

fn new_game_id() -> GameId {
    Uuid::new_v4().to_string()
}

// =============================================================================
// GameService
// =============================================================================

/// The game protocol: lifecycle, moves, takebacks, resignation and rematch.
pub struct GameService<S> {
    store: S,
    config: GameConfig,
}

impl<S: GameStore> GameService<S> {
    pub fn new(store: S, config: GameConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Opens a WAITING game with `creator_id` seated.
    ///
    /// A random seat is resolved now and never re-rolled;
    /// `metadata.isRandomColor` only remembers that it was random.
    pub async fn create(
        &self,
        creator_id: &str,
        color: ColorChoice,
        initial_board: Option<Board>,
    ) -> Result<GameRecord> {
        let seat = color.resolve();
        let record = GameRecord::new(
            new_game_id(),
            creator_id,
            seat,
            color.is_random(),
            initial_board.unwrap_or_else(Board::initial),
            Utc::now(),
            self.config.ttl(),
        );
        self.store.create(record.clone()).await?;

        info!(game_id = %record.id, creator_id, ?seat, "game created");
        Ok(record)
    }

    pub async fn get(&self, game_id: &str) -> Result<GameRecord> {
        self.store.get(game_id).await
    }

    /// Takes the free seat and starts the game.
    ///
    /// Rejoining a seat already held is a no-op. With both seats held by
    /// others the join fails with `GameFull`.
    pub async fn join(&self, game_id: &str, player_id: &str) -> Result<GameRecord> {
        let record = self
            .store
            .run_transaction(game_id, |tx| {
                let current = tx.record();
                if current.is_participant(player_id) {
                    return Ok(current.clone());
                }
                let Some(seat) = current.players.open_seat() else {
                    return Err(GameError::GameFull {
                        game_id: current.id.clone(),
                    });
                };

                let mut next = current.clone();
                *next.players.seat_mut(seat) = Some(player_id.to_string());
                next.status = GameStatus::Active;
                next.version += 1;
                tx.update(next.clone());
                Ok(next)
            })
            .await?;

        info!(game_id, player_id, version = record.version, "player joined");
        Ok(record)
    }

    /// Commits a move prepared against version `expected_version`.
    ///
    /// The move is re-validated against the stored position and the draw
    /// ceiling is checked against the stored half-move clock. On success the
    /// pre-move state becomes the takeback snapshot and any pending takeback
    /// request is dropped. On any error the record is left untouched.
    pub async fn commit_move(
        &self,
        game_id: &str,
        expected_version: u64,
        commit: MoveCommit,
    ) -> Result<GameRecord> {
        let draw_limit = self.config.draw_move_limit;

        let record = self
            .store
            .run_transaction(game_id, |tx| {
                let current = tx.record();
                check_version(current, expected_version)?;
                check_active(current)?;
                if !calculate_allowed_moves(&current.board, current.turn).contains(&commit.mv) {
                    return Err(GameError::IllegalMove {
                        from: commit.mv.from,
                        to: commit.mv.to,
                    });
                }

                let mut next = current.clone();
                next.previous_state = Some(current.snapshot());
                next.board = apply_move(&current.board, &commit.mv);
                next.turn = commit.next_turn;
                next.last_move = Some(commit.mv.clone());
                next.half_move_clock = if commit.resets_clock {
                    0
                } else {
                    current.half_move_clock + 1
                };
                next.status = commit.status;
                next.winner = commit.winner;
                if next.status == GameStatus::Active && next.half_move_clock >= draw_limit {
                    next.status = GameStatus::Draw;
                }
                next.takeback_request = None;
                next.version += 1;

                tx.update(next.clone());
                Ok(next)
            })
            .await?;

        debug!(
            game_id,
            version = record.version,
            half_move_clock = record.half_move_clock,
            "move committed"
        );
        if record.status.is_over() {
            info!(game_id, status = ?record.status, winner = ?record.winner, "game over");
        }
        Ok(record)
    }

    /// Records a takeback proposal from a participant.
    ///
    /// It does not have to be the requester's turn. The version is left
    /// alone, so a move committed meanwhile simply voids the request.
    pub async fn request_takeback(&self, game_id: &str, requester_id: &str) -> Result<GameRecord> {
        self.store
            .run_transaction(game_id, |tx| {
                let current = tx.record();
                if !current.is_participant(requester_id) {
                    return Err(GameError::NotParticipant {
                        game_id: current.id.clone(),
                        player_id: requester_id.to_string(),
                    });
                }

                let mut next = current.clone();
                next.takeback_request = Some(TakebackRequest {
                    requester_id: requester_id.to_string(),
                    created_at: Utc::now(),
                });
                tx.update(next.clone());
                Ok(next)
            })
            .await
    }

    /// Answers the pending takeback request. Returns whether a move was
    /// undone.
    ///
    /// Without a pending request nothing is written: the request was
    /// already answered by someone else or voided by a newer move.
    /// Otherwise the request is cleared and the version bumped. Accepting
    /// restores the snapshot taken before the last move and consumes it, so
    /// only one level of undo exists. A finished game is never rolled back.
    pub async fn resolve_takeback(&self, game_id: &str, accepted: bool) -> Result<bool> {
        let restored = self
            .store
            .run_transaction(game_id, |tx| {
                let current = tx.record();
                if current.takeback_request.is_none() {
                    return Ok(false);
                }

                let mut next = current.clone();
                let restored = match next.previous_state.take() {
                    Some(snapshot) if accepted && !current.status.is_over() => {
                        next.restore(snapshot);
                        true
                    }
                    kept => {
                        next.previous_state = kept;
                        false
                    }
                };
                next.takeback_request = None;
                next.version += 1;
                tx.update(next);
                Ok(restored)
            })
            .await?;

        debug!(game_id, accepted, restored, "takeback resolved");
        Ok(restored)
    }

    /// Ends an active game in favour of the resigner's opponent.
    ///
    /// Resigning a game that is not active, or as a non-participant, leaves
    /// the record as it is.
    pub async fn resign(&self, game_id: &str, resigner_id: &str) -> Result<GameRecord> {
        let record = self
            .store
            .run_transaction(game_id, |tx| {
                let current = tx.record();
                let Some(color) = current.players.color_of(resigner_id) else {
                    return Ok(current.clone());
                };
                if current.status != GameStatus::Active {
                    return Ok(current.clone());
                }

                let mut next = current.clone();
                next.status = GameStatus::Finished;
                next.winner = Some(color.other());
                next.version += 1;
                tx.update(next.clone());
                Ok(next)
            })
            .await?;

        if record.status == GameStatus::Finished {
            info!(game_id, resigner_id, winner = ?record.winner, "game resigned");
        }
        Ok(record)
    }

    /// Writes an outcome a client detected itself, typically a side with
    /// no legal moves on its turn reporting its own loss.
    pub async fn declare_outcome(
        &self,
        game_id: &str,
        expected_version: u64,
        outcome: Outcome,
    ) -> Result<GameRecord> {
        let record = self
            .store
            .run_transaction(game_id, |tx| {
                let current = tx.record();
                check_version(current, expected_version)?;
                check_active(current)?;

                let mut next = current.clone();
                (next.status, next.winner) = match outcome {
                    Outcome::Win(color) => (GameStatus::Finished, Some(color)),
                    Outcome::Draw => (GameStatus::Draw, None),
                };
                next.version += 1;
                tx.update(next.clone());
                Ok(next)
            })
            .await?;

        info!(game_id, ?outcome, "outcome declared");
        Ok(record)
    }

    /// Links `old_game_id` to a successor game and returns its id.
    ///
    /// Only participants may propose, and only once the game is over. The
    /// proposer always switches colour. If a rematch already exists, its id
    /// is returned instead, so racing proposals from both players end up in
    /// the same game.
    pub async fn propose_rematch(
        &self,
        old_game_id: &str,
        proposer_id: &str,
        proposer_old_color: Color,
        is_random: bool,
    ) -> Result<GameId> {
        let ttl = self.config.ttl();

        let (rematch_id, created) = self
            .store
            .run_transaction(old_game_id, |tx| {
                let current = tx.record();
                if !current.is_participant(proposer_id) {
                    return Err(GameError::NotParticipant {
                        game_id: current.id.clone(),
                        player_id: proposer_id.to_string(),
                    });
                }
                if let Some(existing) = &current.rematch_id {
                    return Ok((existing.clone(), false));
                }
                if !current.status.is_over() {
                    return Err(GameError::NotActive {
                        game_id: current.id.clone(),
                    });
                }

                let successor = GameRecord::new(
                    new_game_id(),
                    proposer_id,
                    proposer_old_color.other(),
                    is_random,
                    Board::initial(),
                    Utc::now(),
                    ttl,
                );
                let successor_id = successor.id.clone();

                let mut next = current.clone();
                next.rematch_id = Some(successor_id.clone());
                next.version += 1;
                tx.update(next);
                tx.create(successor);
                Ok((successor_id, true))
            })
            .await?;

        if created {
            info!(old_game_id, %rematch_id, proposer_id, "rematch created");
        }
        Ok(rematch_id)
    }

    /// Receiver tracking the latest committed state of a game.
    pub async fn subscribe(&self, game_id: &str) -> Result<Subscription> {
        self.store.subscribe(game_id).await
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod protocol_tests;
