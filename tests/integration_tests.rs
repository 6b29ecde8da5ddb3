//! Integration tests for muhle-engine
//!
//! Reference move-tree counts, search behaviour on hand-built positions and
//! the evaluator, all through the public API.

use std::sync::atomic::AtomicBool;

use muhle_engine::board::Player;
use muhle_engine::constants::MAX_EVALUATION;
use muhle_engine::evaluation::{Outcome, evaluate, game_over};
use muhle_engine::game::Game;
use muhle_engine::movegen::{generate_moves, perft};
use muhle_engine::parameters::SearchParameters;
use muhle_engine::position::{Move, Phase, Position};
use muhle_engine::search::{SearchResult, search};
use muhle_engine::topology::are_adjacent;

// =============================================================================
// Helper functions
// =============================================================================

fn pos(snapshot: &str) -> Position {
    snapshot
        .parse()
        .unwrap_or_else(|e| panic!("bad snapshot {snapshot}: {e}"))
}

fn search_depth(position: &Position, depth: u32) -> SearchResult {
    let params = SearchParameters {
        depth,
        ..SearchParameters::default()
    };
    search(position, &[], &params, &AtomicBool::new(false))
}

// =============================================================================
// Move tree counts
// =============================================================================

#[test]
fn test_perft_reference_counts() {
    let mut root = Position::new();
    assert_eq!(perft(&mut root, 1), 24);
    assert_eq!(perft(&mut root, 2), 24 * 23);
    assert_eq!(perft(&mut root, 3), 24 * 23 * 22);
    assert_eq!(perft(&mut root, 4), 24 * 23 * 22 * 21);
    // White's third stone can close a mill and fan out into two takes
    assert_eq!(perft(&mut root, 5), 5_140_800);
    assert_eq!(root, Position::new());
}

#[test]
fn test_make_unmake_restores_every_child() {
    let mut root = pos("w:0,1,4,12,20;b:3,9,10,22;w;22;1");
    let before = root;
    for mv in generate_moves(&mut root) {
        let undo = root.make_move(mv);
        let mut child = root;
        for reply in generate_moves(&mut child) {
            let child_before = child;
            let undo = child.make_move(reply);
            child.unmake_move(reply, undo);
            assert_eq!(child, child_before, "after {mv} {reply}");
        }
        root.unmake_move(mv, undo);
        assert_eq!(root, before, "after {mv}");
    }
}

// =============================================================================
// Move generation by phase
// =============================================================================

#[test]
fn test_first_ply_is_placement() {
    let mut root = Position::new();
    let moves = generate_moves(&mut root);
    assert_eq!(moves.len(), 24);
    assert!(moves.iter().all(|m| matches!(m, Move::Place { .. })));
}

#[test]
fn test_three_black_stones_fly() {
    let mut position = pos("w:0,1,4,10,20;b:12,16,23;b;31;5");
    assert_eq!(position.phase(), Phase::Flying);
    assert_eq!(position.phase_of(Player::White), Phase::Sliding);

    let moves = generate_moves(&mut position);
    assert!(
        moves
            .iter()
            .filter_map(|m| m.source().map(|s| (s, m.target())))
            .any(|(s, t)| !are_adjacent(s, t)),
        "no flying move among {moves:?}"
    );
    // 16 empty nodes for each stone, no mills reachable
    assert_eq!(moves.len(), 3 * 16);
}

#[test]
fn test_take_variants_per_capturable_stone() {
    // Placing on 2 closes 0-1-2; black 3-4-5 is a mill, 9 and 10 are loose
    let mut position = pos("w:0,1,20;b:3,4,5,9,10;w;8;8");
    let captured: Vec<usize> = generate_moves(&mut position)
        .iter()
        .filter(|m| m.target() == 2)
        .filter_map(|m| m.captured())
        .collect();
    assert_eq!(captured, vec![9, 10]);
}

#[test]
fn test_crowded_position_is_playable() {
    // Eight black slides close a mill, each fanning out into seven takes
    let position = pos("w:2,6,10,15,16,22,23;b:1,3,5,7,9,12,14,20;b;23;5");
    let mut game = Game::from_position(position);
    let moves = game.legal_moves();
    assert_eq!(moves.len(), 63);

    let result = search_depth(&position, 2);
    let best = result.best_move.expect("black has moves");
    assert!(moves.contains(&best));
    game.play(best).unwrap();
    assert_eq!(game.moves(), &[best]);
}

// =============================================================================
// Evaluation
// =============================================================================

#[test]
fn test_nine_against_two_is_white_win() {
    let position = pos("w:0,1,2,3,4,5,6,7,8;b:21,22;w;40;1");
    let outcome = game_over(&position);
    assert_eq!(outcome, Some(Outcome::WhiteWins));

    for freedom in [0, 1, 50, -50] {
        let params = SearchParameters {
            freedom,
            ..SearchParameters::default()
        };
        assert_eq!(evaluate(&position, &params, outcome, 0), MAX_EVALUATION);
    }
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_depth_one_search_places() {
    let result = search_depth(&Position::new(), 1);
    assert!(matches!(result.best_move, Some(Move::Place { .. })));
}

#[test]
fn test_search_is_deterministic() {
    let position = pos("w:0,4,10;b:1,9,13;w;6;6");
    let a = search_depth(&position, 3);
    let b = search_depth(&position, 3);
    assert_eq!(a.best_move, b.best_move);
    assert_eq!(a.evaluation, b.evaluation);
    assert_eq!(a.nodes, b.nodes);
}

#[test]
fn test_search_blocks_open_mill() {
    // Black threatens 0-9-21; white must place on 21 or lose a stone
    let position = pos("w:4,12;b:0,9,13;w;5;5");
    let result = search_depth(&position, 2);
    assert_eq!(result.best_move, Some(Move::Place { target: 21 }));
}

#[test]
fn test_search_prefers_the_quicker_win() {
    // 14-2 closes 0-1-2 and leaves black with two stones
    let position = pos("w:0,1,14,20;b:12,16,22;w;40;0");
    let result = search_depth(&position, 4);
    let mv = result.best_move.unwrap();
    assert_eq!((mv.source(), mv.target()), (Some(14), 2));
    assert_eq!(result.evaluation, MAX_EVALUATION - 1);
}

#[test]
fn test_black_search_minimizes() {
    // Black closes 21-22-23 by sliding 14-23
    let position = pos("w:1,9,12;b:14,21,22,20;b;40;0");
    let result = search_depth(&position, 2);
    let mv = result.best_move.unwrap();
    assert_eq!((mv.source(), mv.target()), (Some(14), 23));
    assert!(mv.is_capture());
    assert_eq!(result.evaluation, -MAX_EVALUATION + 1);
}
