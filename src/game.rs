//! A game in progress: committed moves, history and outcome.

use log::info;

use crate::engine::SearchRequest;
use crate::error::GameError;
use crate::evaluation::{Outcome, game_over};
use crate::movegen::{MoveList, generate_moves, is_legal};
use crate::position::{Move, Position};
use crate::repetition::{Fingerprint, RepetitionTracker};

#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    /// Positions since the last capture, oldest first, excluding `position`
    history: Vec<Position>,
    tracker: RepetitionTracker,
    moves: Vec<Move>,
    repeated: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::from_position(Position::new())
    }

    /// Start from an arbitrary position with no history.
    pub fn from_position(position: Position) -> Self {
        let mut tracker = RepetitionTracker::new();
        tracker.observe(Fingerprint::of(&position));
        Self {
            position,
            history: Vec::new(),
            tracker,
            moves: Vec::new(),
            repeated: false,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn history(&self) -> &[Position] {
        &self.history
    }

    /// Every move committed since the game started.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn legal_moves(&self) -> MoveList {
        let mut pos = self.position;
        generate_moves(&mut pos)
    }

    /// Commit `mv` for the side to move.
    pub fn play(&mut self, mv: Move) -> Result<(), GameError> {
        if self.outcome().is_some() {
            return Err(GameError::GameOver);
        }
        let mut scratch = self.position;
        if !is_legal(&mut scratch, mv) {
            return Err(GameError::IllegalMove(mv));
        }

        let previous = self.position;
        self.position.make_move(mv);
        self.moves.push(mv);

        if mv.is_capture() {
            self.history.clear();
            self.tracker.clear();
        } else {
            self.history.push(previous);
        }

        if self.tracker.observe(Fingerprint::of(&self.position)).is_repetition() {
            info!("threefold repetition after {mv}");
            self.repeated = true;
        }
        Ok(())
    }

    /// The result if the game is decided, `None` while it goes on.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.repeated {
            return Some(Outcome::Draw);
        }
        game_over(&self.position)
    }

    /// A request for the engine to move in the current position.
    pub fn search_request(&self) -> SearchRequest {
        SearchRequest::with_history(self.position, self.history.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Player;

    #[test]
    fn test_play_records_history() {
        let mut game = Game::new();
        game.play(Move::Place { target: 0 }).unwrap();
        game.play(Move::Place { target: 23 }).unwrap();
        assert_eq!(game.history().len(), 2);
        assert_eq!(game.history()[0], Position::new());
        assert_eq!(game.position().player, Player::White);
        assert_eq!(game.moves().len(), 2);
    }

    #[test]
    fn test_illegal_move_rejected() {
        let mut game = Game::new();
        game.play(Move::Place { target: 3 }).unwrap();
        assert_eq!(
            game.play(Move::Place { target: 3 }),
            Err(GameError::IllegalMove(Move::Place { target: 3 }))
        );
        let slide = Move::Move {
            source: 3,
            target: 4,
        };
        assert_eq!(game.play(slide), Err(GameError::IllegalMove(slide)));
        assert_eq!(game.moves().len(), 1);
    }

    #[test]
    fn test_capture_clears_history() {
        let pos: Position = "w:0,1;b:9,10;w;4;4".parse().unwrap();
        let mut game = Game::from_position(pos);
        game.play(Move::Place { target: 5 }).unwrap();
        game.play(Move::Place { target: 20 }).unwrap();
        assert_eq!(game.history().len(), 2);

        game.play(Move::PlaceTake {
            target: 2,
            captured: 9,
        })
        .unwrap();
        assert!(game.history().is_empty());
        assert!(game.search_request().history.is_empty());
    }

    #[test]
    fn test_threefold_repetition_is_a_draw() {
        let pos: Position = "w:0,2,21,23;b:4,7,10,13,16,19;w;40;5".parse().unwrap();
        let mut game = Game::from_position(pos);
        let shuffle = [
            Move::Move {
                source: 0,
                target: 1,
            },
            Move::Move {
                source: 4,
                target: 3,
            },
            Move::Move {
                source: 1,
                target: 0,
            },
            Move::Move {
                source: 3,
                target: 4,
            },
        ];

        for mv in shuffle {
            game.play(mv).unwrap();
        }
        assert_eq!(game.outcome(), None);
        for mv in shuffle {
            game.play(mv).unwrap();
        }
        assert_eq!(game.outcome(), Some(Outcome::Draw));
        assert_eq!(game.play(shuffle[0]), Err(GameError::GameOver));
    }

    #[test]
    fn test_outcome_after_win() {
        let pos: Position = "w:0,1,14,20;b:12,16,22;w;40;0".parse().unwrap();
        let mut game = Game::from_position(pos);
        game.play(Move::MoveTake {
            source: 14,
            target: 2,
            captured: 16,
        })
        .unwrap();
        assert_eq!(game.outcome(), Some(Outcome::WhiteWins));
    }
}
