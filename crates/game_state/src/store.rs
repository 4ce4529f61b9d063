//! Document store contract and an in-memory implementation.
//!
//! The protocol only needs get, create, a single-document read-modify-write
//! transaction with first-committer-wins isolation, and change
//! subscriptions. Anything offering those (a hosted document database, a
//! SQL row with a revision column) can sit behind [`GameStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};
use tracing::warn;

use crate::error::{GameError, Result};
use crate::record::{GameId, GameRecord};

/// Latest committed snapshot of a document.
pub type Subscription = watch::Receiver<Option<GameRecord>>;

// =============================================================================
// Transaction
// =============================================================================

/// Staged writes of one transaction attempt.
///
/// The closure passed to [`GameStore::run_transaction`] reads
/// [`record`](Transaction::record) and stages writes; nothing reaches the
/// store unless the whole attempt commits.
#[derive(Debug)]
pub struct Transaction {
    read: GameRecord,
    update: Option<GameRecord>,
    creates: Vec<GameRecord>,
}

impl Transaction {
    pub fn new(read: GameRecord) -> Self {
        Self {
            read,
            update: None,
            creates: Vec::new(),
        }
    }

    /// The record as read at the start of this attempt.
    pub fn record(&self) -> &GameRecord {
        &self.read
    }

    /// Replace the transaction's document on commit.
    pub fn update(&mut self, record: GameRecord) {
        self.update = Some(record);
    }

    /// Create another document on commit. Fails the commit with
    /// `AlreadyExists` if the id is taken by then.
    pub fn create(&mut self, record: GameRecord) {
        self.creates.push(record);
    }

    pub fn into_writes(self) -> (Option<GameRecord>, Vec<GameRecord>) {
        (self.update, self.creates)
    }
}

// =============================================================================
// Store contract
// =============================================================================

/// Transactional document store holding game records.
#[async_trait]
pub trait GameStore: Send + Sync {
    /// Fetch the latest committed record.
    async fn get(&self, game_id: &str) -> Result<GameRecord>;

    /// Store a new record under its id.
    async fn create(&self, record: GameRecord) -> Result<()>;

    /// Run `f` against the current record and commit its staged writes
    /// atomically.
    ///
    /// If another writer commits to the document between the read and the
    /// commit, the attempt is discarded and `f` re-runs on the fresh record.
    /// An error returned by `f` aborts without writing anything.
    async fn run_transaction<T, F>(&self, game_id: &str, f: F) -> Result<T>
    where
        T: Send,
        F: FnMut(&mut Transaction) -> Result<T> + Send;

    /// Receiver that always holds the latest committed record.
    async fn subscribe(&self, game_id: &str) -> Result<Subscription>;
}

// =============================================================================
// In-memory store
// =============================================================================

struct Document {
    value: serde_json::Value,
    revision: u64,
    notify: watch::Sender<Option<GameRecord>>,
}

impl Document {
    fn new(value: serde_json::Value, snapshot: Option<GameRecord>) -> Self {
        let (notify, _) = watch::channel(snapshot);
        Self {
            value,
            revision: 0,
            notify,
        }
    }
}

/// Store keeping documents as JSON values in process memory.
///
/// Documents are stored encoded, so a record written by a foreign client in
/// a bad shape fails to decode on read exactly as it would against a remote
/// store. Transactions are optimistic: the closure runs without holding the
/// lock and the commit checks a per-document revision.
pub struct InMemoryStore {
    docs: Mutex<HashMap<GameId, Document>>,
    max_attempts: u32,
}

impl InMemoryStore {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            docs: Mutex::new(HashMap::new()),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.docs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.lock().await.is_empty()
    }

    /// Store a raw document without validation, replacing any existing one.
    ///
    /// Used for importing documents written by other clients.
    pub async fn insert_raw(&self, game_id: &str, value: serde_json::Value) {
        let snapshot = GameRecord::from_value(value.clone()).ok();
        let mut docs = self.docs.lock().await;
        match docs.get_mut(game_id) {
            Some(doc) => {
                doc.value = value;
                doc.revision += 1;
                doc.notify.send_replace(snapshot);
            }
            None => {
                docs.insert(game_id.to_string(), Document::new(value, snapshot));
            }
        }
    }

    async fn read(&self, game_id: &str) -> Result<(serde_json::Value, u64)> {
        let docs = self.docs.lock().await;
        let doc = docs.get(game_id).ok_or_else(|| GameError::not_found(game_id))?;
        Ok((doc.value.clone(), doc.revision))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(5)
    }
}

#[async_trait]
impl GameStore for InMemoryStore {
    async fn get(&self, game_id: &str) -> Result<GameRecord> {
        let (value, _) = self.read(game_id).await?;
        GameRecord::from_value(value)
    }

    async fn create(&self, record: GameRecord) -> Result<()> {
        let value = record.to_value()?;
        let mut docs = self.docs.lock().await;
        if docs.contains_key(&record.id) {
            return Err(GameError::AlreadyExists { game_id: record.id });
        }
        docs.insert(record.id.clone(), Document::new(value, Some(record)));
        Ok(())
    }

    async fn run_transaction<T, F>(&self, game_id: &str, mut f: F) -> Result<T>
    where
        T: Send,
        F: FnMut(&mut Transaction) -> Result<T> + Send,
    {
        for attempt in 1..=self.max_attempts {
            let (value, revision) = self.read(game_id).await?;
            let mut tx = Transaction::new(GameRecord::from_value(value)?);
            let out = f(&mut tx)?;
            let (update, creates) = tx.into_writes();

            let mut docs = self.docs.lock().await;
            let current = docs.get(game_id).map(|d| d.revision);
            if current != Some(revision) {
                drop(docs);
                warn!(game_id, attempt, "transaction lost commit race, retrying");
                tokio::task::yield_now().await;
                continue;
            }

            // Encode everything before touching any document.
            let update = update
                .map(|record| record.to_value().map(|value| (record, value)))
                .transpose()?;
            let mut created = Vec::with_capacity(creates.len());
            for record in creates {
                if record.id == game_id || docs.contains_key(&record.id) {
                    return Err(GameError::AlreadyExists { game_id: record.id });
                }
                let value = record.to_value()?;
                created.push((record, value));
            }

            if let Some((record, value)) = update {
                if let Some(doc) = docs.get_mut(game_id) {
                    doc.value = value;
                    doc.revision += 1;
                    doc.notify.send_replace(Some(record));
                }
            }
            for (record, value) in created {
                docs.insert(record.id.clone(), Document::new(value, Some(record)));
            }

            return Ok(out);
        }

        warn!(game_id, attempts = self.max_attempts, "transaction abandoned");
        Err(GameError::Contention {
            game_id: game_id.to_string(),
            attempts: self.max_attempts,
        })
    }

    async fn subscribe(&self, game_id: &str) -> Result<Subscription> {
        let docs = self.docs.lock().await;
        let doc = docs.get(game_id).ok_or_else(|| GameError::not_found(game_id))?;
        Ok(doc.notify.subscribe())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
