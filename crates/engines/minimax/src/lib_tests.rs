use super::*;
use checkers_core::calculate_allowed_moves;

#[test]
fn minimax_engine_returns_legal_move() {
    let mut engine = MinimaxEngine::new();
    let start = Board::initial();

    let result = engine.search(&start, Color::Black, SearchLimits::depth(2));

    let mv = result.best_move.expect("black has moves at the start");
    assert!(calculate_allowed_moves(&start, Color::Black).contains(&mv));
    assert_eq!(result.depth, 2);
    assert!(result.nodes > 0);
}

#[test]
fn minimax_engine_handles_no_moves() {
    let mut engine = MinimaxEngine::new();
    let result = engine.search(&Board::empty(), Color::White, SearchLimits::depth(2));

    assert!(result.best_move.is_none());
    assert!(!result.stopped);
}

#[test]
fn smart_bot_move_is_legal_with_default_limits() {
    let start = Board::initial();
    let mv = get_smart_bot_move(&start, Color::White).expect("move");
    assert!(calculate_allowed_moves(&start, Color::White).contains(&mv));
}

#[test]
fn smart_bot_move_with_explicit_limits() {
    let limits = SearchLimits::depth(1).with_quiescence_depth(0);
    assert!(get_smart_bot_move_with(&Board::empty(), Color::Black, &limits).is_none());
    assert!(get_smart_bot_move_with(&Board::initial(), Color::Black, &limits).is_some());
}
