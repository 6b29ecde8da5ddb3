//! Random playouts.
//!
//! Random moves are used to vary self-play openings and to produce
//! arbitrary game prefixes for property tests. The generator is passed in
//! so callers can seed it for reproducible games.

use fastrand::Rng;

use crate::evaluation::game_over;
use crate::movegen::generate_moves;
use crate::position::{Move, Position};

/// Pick a uniformly random legal move, or `None` if there is none.
pub fn random_move(pos: &mut Position, rng: &mut Rng) -> Option<Move> {
    let moves = generate_moves(pos);
    if moves.is_empty() {
        return None;
    }
    Some(moves[rng.usize(..moves.len())])
}

/// Play random moves on `pos` until the game is decided or `max_plies`
/// moves have been played. Returns the moves in order.
///
/// Repetition is not tracked; only board-decided endings stop the game.
pub fn random_game(pos: &mut Position, max_plies: usize, rng: &mut Rng) -> Vec<Move> {
    let mut played = Vec::with_capacity(max_plies);

    while played.len() < max_plies && game_over(pos).is_none() {
        let Some(mv) = random_move(pos, rng) else {
            break;
        };
        pos.make_move(mv);
        played.push(mv);
    }

    played
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::is_legal;

    #[test]
    fn test_random_move_is_legal() {
        let mut rng = Rng::with_seed(7);
        let mut pos = Position::new();
        for _ in 0..10 {
            let mv = random_move(&mut pos, &mut rng).unwrap();
            assert!(is_legal(&mut pos, mv));
            pos.make_move(mv);
        }
        assert_eq!(pos.plies, 10);
    }

    #[test]
    fn test_random_move_none_when_blocked() {
        let mut rng = Rng::with_seed(1);
        let mut pos: Position = "w:0,2,21,23;b:1,9,14,22,4;w;20;2".parse().unwrap();
        assert_eq!(random_move(&mut pos, &mut rng), None);
    }

    #[test]
    fn test_random_game_respects_cap() {
        let mut rng = Rng::with_seed(42);
        let mut pos = Position::new();
        let moves = random_game(&mut pos, 12, &mut rng);
        assert_eq!(moves.len(), 12);
        assert_eq!(pos.plies, 12);
    }

    #[test]
    fn test_random_game_is_reproducible() {
        let a = random_game(&mut Position::new(), 40, &mut Rng::with_seed(3));
        let b = random_game(&mut Position::new(), 40, &mut Rng::with_seed(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_game_stops_when_decided() {
        let mut rng = Rng::with_seed(5);
        let mut pos = Position::new();
        let moves = random_game(&mut pos, 1000, &mut rng);
        if moves.len() < 1000 {
            assert!(game_over(&pos).is_some());
        }
    }
}
