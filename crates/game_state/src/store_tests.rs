use super::*;
use chrono::Utc;
use checkers_core::{Board, Color};
use serde_json::json;

fn record(id: &str) -> GameRecord {
    GameRecord::new(
        id.to_string(),
        "alice",
        Color::White,
        false,
        Board::initial(),
        Utc::now(),
        chrono::Duration::hours(1),
    )
}

/// Simulates another client committing between our read and our commit.
fn interfere(store: &InMemoryStore, game_id: &str) {
    let mut docs = store
        .docs
        .try_lock()
        .expect("store lock is released while the closure runs");
    docs.get_mut(game_id).unwrap().revision += 1;
}

fn bump_version(tx: &mut Transaction) -> Result<u64> {
    let mut next = tx.record().clone();
    next.version += 1;
    tx.update(next.clone());
    Ok(next.version)
}

#[tokio::test]
async fn test_create_then_get() {
    let store = InMemoryStore::default();
    store.create(record("g")).await.unwrap();

    let stored = store.get("g").await.unwrap();
    assert_eq!(stored.id, "g");
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_create_twice_is_rejected() {
    let store = InMemoryStore::default();
    store.create(record("g")).await.unwrap();

    let err = store.create(record("g")).await.unwrap_err();
    assert!(matches!(err, GameError::AlreadyExists { .. }));
}

#[tokio::test]
async fn test_missing_document() {
    let store = InMemoryStore::default();
    assert!(store.is_empty().await);
    assert!(matches!(store.get("nope").await, Err(GameError::NotFound { .. })));
    assert!(matches!(
        store.run_transaction("nope", bump_version).await,
        Err(GameError::NotFound { .. })
    ));
    assert!(matches!(store.subscribe("nope").await, Err(GameError::NotFound { .. })));
}

#[tokio::test]
async fn test_transaction_commits_and_notifies() {
    let store = InMemoryStore::default();
    store.create(record("g")).await.unwrap();
    let mut rx = store.subscribe("g").await.unwrap();

    let version = store.run_transaction("g", bump_version).await.unwrap();
    assert_eq!(version, 1);

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().as_ref().unwrap().version, 1);
    assert_eq!(store.get("g").await.unwrap().version, 1);
}

#[tokio::test]
async fn test_failed_transaction_writes_nothing() {
    let store = InMemoryStore::default();
    store.create(record("g")).await.unwrap();
    let before = store.get("g").await.unwrap();
    let rx = store.subscribe("g").await.unwrap();

    let result: Result<()> = store
        .run_transaction("g", |tx| {
            let mut next = tx.record().clone();
            next.version += 10;
            next.board = Board::empty();
            tx.update(next);
            Err(GameError::GameFull {
                game_id: "g".to_string(),
            })
        })
        .await;

    assert!(matches!(result, Err(GameError::GameFull { .. })));
    assert_eq!(store.get("g").await.unwrap(), before);
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_read_only_transaction_keeps_revision() {
    let store = InMemoryStore::default();
    store.create(record("g")).await.unwrap();

    let version = store
        .run_transaction("g", |tx| Ok(tx.record().version))
        .await
        .unwrap();

    assert_eq!(version, 0);
    assert_eq!(store.docs.lock().await["g"].revision, 0);
}

#[tokio::test]
async fn test_lost_race_reruns_closure() {
    let store = InMemoryStore::new(3);
    store.create(record("g")).await.unwrap();

    let mut runs = 0;
    let version = store
        .run_transaction("g", |tx| {
            runs += 1;
            if runs == 1 {
                interfere(&store, "g");
            }
            bump_version(tx)
        })
        .await
        .unwrap();

    assert_eq!(runs, 2);
    assert_eq!(version, 1);
    assert_eq!(store.get("g").await.unwrap().version, 1);
}

#[tokio::test]
async fn test_persistent_contention_gives_up() {
    let store = InMemoryStore::new(2);
    store.create(record("g")).await.unwrap();

    let mut runs = 0;
    let result = store
        .run_transaction("g", |tx| {
            runs += 1;
            interfere(&store, "g");
            bump_version(tx)
        })
        .await;

    assert!(matches!(result, Err(GameError::Contention { attempts: 2, .. })));
    assert_eq!(runs, 2);
    assert_eq!(store.get("g").await.unwrap().version, 0);
}

#[tokio::test]
async fn test_staged_create_commits_with_update() {
    let store = InMemoryStore::default();
    store.create(record("g")).await.unwrap();

    store
        .run_transaction("g", |tx| {
            tx.create(record("h"));
            bump_version(tx)
        })
        .await
        .unwrap();

    assert_eq!(store.get("g").await.unwrap().version, 1);
    assert_eq!(store.get("h").await.unwrap().status, crate::GameStatus::Waiting);
    assert!(store.subscribe("h").await.unwrap().borrow().is_some());
}

#[tokio::test]
async fn test_staged_create_of_taken_id_aborts() {
    let store = InMemoryStore::default();
    store.create(record("g")).await.unwrap();
    store.create(record("h")).await.unwrap();

    let result = store
        .run_transaction("g", |tx| {
            tx.create(record("h"));
            bump_version(tx)
        })
        .await;

    assert!(matches!(result, Err(GameError::AlreadyExists { .. })));
    assert_eq!(store.get("g").await.unwrap().version, 0);
}

#[tokio::test]
async fn test_raw_document_that_does_not_decode() {
    let store = InMemoryStore::default();
    store.insert_raw("bad", json!({"id": "bad", "board": 5})).await;

    assert!(matches!(store.get("bad").await, Err(GameError::MalformedState(_))));
    assert!(matches!(
        store.run_transaction("bad", bump_version).await,
        Err(GameError::MalformedState(_))
    ));
    assert!(store.subscribe("bad").await.unwrap().borrow().is_none());
}

#[tokio::test]
async fn test_raw_replacement_notifies() {
    let store = InMemoryStore::default();
    store.create(record("g")).await.unwrap();
    let mut rx = store.subscribe("g").await.unwrap();

    let mut value = record("g").to_value().unwrap();
    value["version"] = json!(42);
    store.insert_raw("g", value).await;

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().as_ref().unwrap().version, 42);
}
