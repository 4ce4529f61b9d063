//! Full games played by the bots through the protocol, the way two clients
//! would: read the latest record, pick a move, commit with the seen version.

use checkers_core::{calculate_allowed_moves, Color, Engine, SearchLimits};
use game_state::{
    ColorChoice, GameConfig, GameError, GameRecord, GameService, GameStatus, InMemoryStore,
    MoveCommit, Outcome,
};
use minimax_engine::MinimaxEngine;
use random_engine::RandomEngine;

const MAX_PLIES: usize = 2000;

async fn play_out(
    service: &GameService<InMemoryStore>,
    game_id: &str,
    white: &mut dyn Engine,
    black: &mut dyn Engine,
    limits: &SearchLimits,
) -> GameRecord {
    let mut last_version = None;

    for _ in 0..MAX_PLIES {
        let game = service.get(game_id).await.unwrap();
        if let Some(v) = last_version {
            assert!(game.version > v, "versions must strictly increase");
        }
        last_version = Some(game.version);

        if game.status != GameStatus::Active {
            return game;
        }

        let engine: &mut dyn Engine = match game.turn {
            Color::White => &mut *white,
            Color::Black => &mut *black,
        };
        let result = engine.search(&game.board, game.turn, limits.fresh());

        let Some(mv) = result.best_move else {
            // Stuck on our own turn: report the loss ourselves.
            service
                .declare_outcome(game_id, game.version, Outcome::Win(game.turn.other()))
                .await
                .unwrap();
            continue;
        };
        assert!(calculate_allowed_moves(&game.board, game.turn).contains(&mv));

        let commit = MoveCommit::prepare(&game, mv.clone());
        let after = service
            .commit_move(game_id, game.version, commit)
            .await
            .unwrap();

        let previous = after.previous_state.as_ref().expect("snapshot of the pre-move state");
        assert_eq!(previous.board, game.board);
        assert_eq!(previous.turn, game.turn);
        assert_eq!(after.last_move.as_ref(), Some(&mv));
        if after.status == GameStatus::Active {
            assert_eq!(after.turn, game.turn.other());
        }
    }

    service.get(game_id).await.unwrap()
}

async fn new_game(service: &GameService<InMemoryStore>) -> String {
    let game = service
        .create("white-bot", ColorChoice::White, None)
        .await
        .unwrap();
    service.join(&game.id, "black-bot").await.unwrap();
    game.id
}

#[tokio::test]
async fn minimax_against_random_reaches_an_end() {
    let service = GameService::new(InMemoryStore::default(), GameConfig::default());
    let game_id = new_game(&service).await;
    let limits = SearchLimits::depth(2).with_quiescence_depth(2);

    let mut smart = MinimaxEngine::new();
    let mut random = RandomEngine::new();
    let end = play_out(&service, &game_id, &mut smart, &mut random, &limits).await;

    assert!(end.status.is_over(), "game did not finish: {:?}", end.status);
    if end.status == GameStatus::Finished {
        assert!(end.winner.is_some());
    }
}

#[tokio::test]
async fn random_bots_respect_the_draw_ceiling() {
    let config = GameConfig {
        draw_move_limit: 10,
        ..GameConfig::default()
    };
    let service = GameService::new(InMemoryStore::default(), config);
    let game_id = new_game(&service).await;

    let mut white = RandomEngine::new();
    let mut black = RandomEngine::new();
    let end = play_out(
        &service,
        &game_id,
        &mut white,
        &mut black,
        &SearchLimits::depth(1),
    )
    .await;

    assert!(end.status.is_over());
    assert!(end.half_move_clock <= 10);
    if end.status == GameStatus::Draw {
        assert!(end.winner.is_none());
    }
}

#[tokio::test]
async fn takeback_mid_game_then_continue() {
    let service = GameService::new(InMemoryStore::default(), GameConfig::default());
    let game_id = new_game(&service).await;
    let mut bot = MinimaxEngine::new();
    let limits = SearchLimits::depth(2);

    let start = service.get(&game_id).await.unwrap();
    let mv = bot
        .search(&start.board, start.turn, limits.fresh())
        .best_move
        .unwrap();
    service
        .commit_move(&game_id, start.version, MoveCommit::prepare(&start, mv.clone()))
        .await
        .unwrap();

    service.request_takeback(&game_id, "white-bot").await.unwrap();
    assert!(service.resolve_takeback(&game_id, true).await.unwrap());
    let undone = service.get(&game_id).await.unwrap();
    assert_eq!(undone.board, start.board);
    assert_eq!(undone.turn, Color::White);

    // The snapshot the bot moved from is stale now
    let replay = MoveCommit::prepare(&start, mv);
    let err = service
        .commit_move(&game_id, start.version, replay)
        .await
        .unwrap_err();
    assert!(matches!(err, GameError::VersionConflict { .. }));

    // Fresh read, fresh move
    let mv = bot
        .search(&undone.board, undone.turn, limits.fresh())
        .best_move
        .unwrap();
    let again = service
        .commit_move(&game_id, undone.version, MoveCommit::prepare(&undone, mv))
        .await
        .unwrap();
    assert_eq!(again.version, undone.version + 1);
}
