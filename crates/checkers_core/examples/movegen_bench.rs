//! Move generation benchmark for profiling with cargo-flamegraph.
//!
//! Runs many iterations of calculate_allowed_moves on positions that stress
//! the simple-move path, man capture chains and flying-king capture search.
//!
//! Usage:
//!   cargo flamegraph --example movegen_bench -p checkers_core

use checkers_core::{calculate_allowed_moves, Board, Color};
use std::time::Instant;

/// Positions covering different game phases and complexity levels
const TEST_POSITIONS: &[(&str, Color, &str)] = &[
    (
        "Start",
        Color::White,
        ".b.b.b.b
         b.b.b.b.
         .b.b.b.b
         ........
         ........
         w.w.w.w.
         .w.w.w.w
         w.w.w.w.",
    ),
    (
        "Contact",
        Color::White,
        ".b.b.b.b
         b.b.b.b.
         .b...b.b
         ..b.....
         ...w....
         w...w.w.
         .w.w.w.w
         w.w.w.w.",
    ),
    (
        "Man chain",
        Color::White,
        "........
         ........
         .b.b....
         ........
         .b.b....
         ..w.....
         ........
         ........",
    ),
    (
        "Flying kings",
        Color::White,
        "........
         ..b.b...
         ........
         ..b.b...
         ........
         ..b.b...
         ........
         W.....W.",
    ),
    (
        "King endgame",
        Color::Black,
        ".B......
         ........
         ........
         ....w...
         ........
         ........
         ........
         W.......",
    ),
];

const ITERATIONS: usize = 100_000;

fn main() {
    println!("=== Move Generation Benchmark ===");
    println!("Iterations per position: {ITERATIONS}");
    println!();

    let mut total_moves = 0usize;
    let mut total_time = std::time::Duration::ZERO;

    for (name, side, diagram) in TEST_POSITIONS {
        let board = match Board::from_diagram(diagram) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("{name}: {e}");
                continue;
            }
        };

        print!("{name:.<20}");

        let start = Instant::now();
        let mut moves_generated = 0usize;

        for _ in 0..ITERATIONS {
            moves_generated += calculate_allowed_moves(&board, *side).len();
        }

        let elapsed = start.elapsed();
        total_moves += moves_generated;
        total_time += elapsed;

        let moves_per_pos = moves_generated as f64 / ITERATIONS as f64;
        let mps = if elapsed.as_secs_f64() > 0.0 {
            ITERATIONS as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        println!(" {moves_per_pos:>5.1} moves/pos, {mps:>10.0} pos/sec ({elapsed:>8.3?})");
    }

    println!();
    println!("{:=<70}", "");
    let avg_mps = if total_time.as_secs_f64() > 0.0 {
        (ITERATIONS * TEST_POSITIONS.len()) as f64 / total_time.as_secs_f64()
    } else {
        0.0
    };
    println!("TOTAL: {total_moves} moves in {total_time:.3?} ({avg_mps:.0} positions/sec)");
}
