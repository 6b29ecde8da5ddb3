//! Legal move generation.
//!
//! Moves are generated per phase (placement, sliding, flying) by applying the
//! primary action on the position, testing the resulting board for a newly
//! closed mill, and taking the action back again. A mill-closing action is
//! expanded into one take move per capturable opposing stone.
//!
//! A capturable stone is one that is not part of a mill, unless every
//! opposing stone is in a mill, in which case all of them are.

use arrayvec::ArrayVec;

use crate::board::Player;
use crate::constants::{MAX_MOVES, NODES};
use crate::position::{Move, Phase, Position};
use crate::topology::Node;

/// Fixed-capacity buffer holding every move of one position.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// Generate all legal moves for the side to move.
///
/// The position is mutated while generating and restored before returning.
///
/// # Panics
/// If a position yields more than [`MAX_MOVES`] moves, which means the rule
/// or topology tables are broken.
pub fn generate_moves(pos: &mut Position) -> MoveList {
    let mut moves = MoveList::new();
    match pos.phase() {
        Phase::Placement => generate_placements(pos, &mut moves),
        Phase::Sliding => generate_slides(pos, &mut moves),
        Phase::Flying => generate_flights(pos, &mut moves),
    }
    moves
}

fn generate_placements(pos: &mut Position, moves: &mut MoveList) {
    let mover = pos.player;
    let targets: ArrayVec<Node, NODES> = pos.board.empty_nodes().collect();

    for target in targets {
        let primary = Move::Place { target };
        let undo = pos.make_move(primary);

        if pos.board.is_mill(mover, target) {
            push_takes(pos, mover, primary, moves, |captured| Move::PlaceTake {
                target,
                captured,
            });
        } else {
            push_move(moves, primary);
        }

        pos.unmake_move(primary, undo);
    }
}

fn generate_slides(pos: &mut Position, moves: &mut MoveList) {
    let mover = pos.player;
    let sources: ArrayVec<Node, NODES> = pos.board.stones(mover).collect();

    for source in sources {
        let targets: ArrayVec<Node, 4> = pos.board.free_neighbors(source).collect();
        for target in targets {
            generate_move(pos, mover, source, target, moves);
        }
    }
}

fn generate_flights(pos: &mut Position, moves: &mut MoveList) {
    let mover = pos.player;
    let sources: ArrayVec<Node, NODES> = pos.board.stones(mover).collect();
    let targets: ArrayVec<Node, NODES> = pos.board.empty_nodes().collect();

    for source in sources {
        for &target in &targets {
            generate_move(pos, mover, source, target, moves);
        }
    }
}

fn generate_move(
    pos: &mut Position,
    mover: Player,
    source: Node,
    target: Node,
    moves: &mut MoveList,
) {
    let primary = Move::Move { source, target };
    let undo = pos.make_move(primary);

    if pos.board.is_mill(mover, target) {
        push_takes(pos, mover, primary, moves, |captured| Move::MoveTake {
            source,
            target,
            captured,
        });
    } else {
        push_move(moves, primary);
    }

    pos.unmake_move(primary, undo);
}

/// Push one take move per capturable opposing stone.
///
/// An opponent with no stones at all leaves nothing to take; the primary
/// action is then kept as a plain move.
fn push_takes(
    pos: &Position,
    mover: Player,
    primary: Move,
    moves: &mut MoveList,
    take: impl Fn(Node) -> Move,
) {
    let victim = mover.opponent();
    let all_in_mills = pos.board.all_in_mills(victim);
    let mut any = false;

    for captured in pos.board.stones(victim) {
        if all_in_mills || !pos.board.is_mill(victim, captured) {
            push_move(moves, take(captured));
            any = true;
        }
    }

    if !any {
        push_move(moves, primary);
    }
}

#[inline]
fn push_move(moves: &mut MoveList, mv: Move) {
    assert!(!moves.is_full(), "move buffer overflow (more than {MAX_MOVES} moves)");
    moves.push(mv);
}

/// Whether the side to move has at least one legal move.
///
/// Cheaper than generating: only looks for a free destination.
pub fn has_legal_move(pos: &Position) -> bool {
    match pos.phase() {
        Phase::Placement | Phase::Flying => pos.board.empty_nodes().next().is_some(),
        Phase::Sliding => pos
            .board
            .stones(pos.player)
            .any(|n| pos.board.freedom(n) > 0),
    }
}

/// Whether `mv` is among the legal moves of the position.
pub fn is_legal(pos: &mut Position, mv: Move) -> bool {
    generate_moves(pos).contains(&mv)
}

/// Count the leaf nodes of the full move tree `depth` plies deep.
///
/// Game-over conditions are not applied; every generated move is followed.
pub fn perft(pos: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(pos);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut count = 0;
    for mv in moves {
        let undo = pos.make_move(mv);
        count += perft(pos, depth - 1);
        pos.unmake_move(mv, undo);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_has_24_placements() {
        let mut pos = Position::new();
        let moves = generate_moves(&mut pos);
        assert_eq!(moves.len(), 24);
        assert!(moves.iter().all(|m| matches!(m, Move::Place { .. })));
        assert_eq!(pos, Position::new());
    }

    #[test]
    fn test_placement_closing_mill_generates_takes() {
        // White has 0 and 1, black has 9 and 10; placing on 2 closes 0-1-2
        let mut pos: Position = "w:0,1;b:9,10;w;4;4".parse().unwrap();
        let moves = generate_moves(&mut pos);

        let takes: Vec<Move> = moves.iter().copied().filter(|m| m.target() == 2).collect();
        assert_eq!(
            takes,
            vec![
                Move::PlaceTake {
                    target: 2,
                    captured: 9
                },
                Move::PlaceTake {
                    target: 2,
                    captured: 10
                },
            ]
        );
        assert_eq!(moves.len(), 19 + 2);
    }

    #[test]
    fn test_stones_in_mill_are_protected() {
        // Black 3-4-5 is a mill, 23 is loose
        let mut pos: Position = "w:0,1,12;b:3,4,5,23;w;7;7".parse().unwrap();
        let moves = generate_moves(&mut pos);
        let captured: Vec<Node> = moves
            .iter()
            .filter(|m| m.target() == 2)
            .filter_map(|m| m.captured())
            .collect();
        assert_eq!(captured, vec![23]);
    }

    #[test]
    fn test_all_in_mills_makes_everything_capturable() {
        let mut pos: Position = "w:0,1,12;b:3,4,5;w;6;6".parse().unwrap();
        let moves = generate_moves(&mut pos);
        let captured: Vec<Node> = moves
            .iter()
            .filter(|m| m.target() == 2)
            .filter_map(|m| m.captured())
            .collect();
        assert_eq!(captured, vec![3, 4, 5]);
    }

    #[test]
    fn test_sliding_moves_follow_adjacency() {
        let mut pos: Position = "w:0,4,10,19;b:1,3,9,18;w;18;0".parse().unwrap();
        let moves = generate_moves(&mut pos);
        for mv in &moves {
            let source = mv.source().expect("sliding phase emits moves");
            assert!(crate::topology::are_adjacent(source, mv.target()));
        }
        // 0 is blocked, 4: 5,7; 10: 11; 19: 16,20,22
        assert_eq!(moves.len(), 6);
    }

    #[test]
    fn test_blocked_side_has_no_moves() {
        // White's four corner stones are boxed in by black
        let mut pos: Position = "w:0,2,21,23;b:1,9,14,22,4;w;20;2".parse().unwrap();
        assert!(generate_moves(&mut pos).is_empty());
        assert!(!has_legal_move(&pos));
    }

    #[test]
    fn test_flying_reaches_every_empty_node() {
        let mut pos: Position = "w:0,1,2,3;b:12,16,20;b;30;3".parse().unwrap();
        assert_eq!(pos.phase(), Phase::Flying);
        let moves = generate_moves(&mut pos);
        // 17 empty nodes for each of three stones, no mills possible
        assert_eq!(moves.len(), 3 * 17);
        assert!(moves.iter().any(|m| *m
            == Move::Move {
                source: 12,
                target: 21
            }));
    }

    #[test]
    fn test_crowded_sliding_positions_fit_the_buffer() {
        // Reached by random play; each has more than 58 moves
        for (snapshot, expected) in [
            ("w:2,6,10,15,16,22,23;b:1,3,5,7,9,12,14,20;b;23;5", 63),
            ("w:5,8,12,14,16,18,20,22;b:3,4,6,7,10,15,17;w;24;5", 60),
            ("w:1,3,5,7,9,11,16,18,19;b:0,6,8,15,17,20,21;w;26;7", 59),
        ] {
            let mut pos: Position = snapshot.parse().unwrap();
            let before = pos;
            assert_eq!(generate_moves(&mut pos).len(), expected, "{snapshot}");
            assert_eq!(pos, before);
        }
    }

    #[test]
    fn test_ten_mill_closing_slides() {
        let mut pos: Position = "w:1,3,5,7,9,11,13,18,19;b:0,2,6,8,12,15,16,21,23;w;30;4"
            .parse()
            .unwrap();
        let moves = generate_moves(&mut pos);
        assert_eq!(moves.len(), 10 * 9 + 2);
        assert!(moves.len() <= MAX_MOVES);
        assert_eq!(moves.iter().filter(|m| m.captured().is_none()).count(), 2);
    }

    #[test]
    fn test_perft_shallow() {
        let mut pos = Position::new();
        assert_eq!(perft(&mut pos, 1), 24);
        assert_eq!(perft(&mut pos, 2), 24 * 23);
        assert_eq!(perft(&mut pos, 3), 24 * 23 * 22);
        assert_eq!(pos, Position::new());
    }
}
