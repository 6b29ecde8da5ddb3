//! Terminal detection and static evaluation.
//!
//! Scores are always from White's side: positive favors White, negative
//! favors Black.

use crate::board::Player;
use crate::constants::{Eval, MIN_STONES, THREE_PIECES_FREEDOM};
use crate::movegen::has_legal_move;
use crate::parameters::SearchParameters;
use crate::position::{Phase, Position};

/// A decided game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Draw,
}

impl Outcome {
    pub fn win_for(player: Player) -> Self {
        match player {
            Player::White => Outcome::WhiteWins,
            Player::Black => Outcome::BlackWins,
        }
    }

    /// +1 for a White win, -1 for a Black win, 0 for a draw.
    pub fn sign(self) -> Eval {
        match self {
            Outcome::WhiteWins => 1,
            Outcome::BlackWins => -1,
            Outcome::Draw => 0,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::WhiteWins => Some(Player::White),
            Outcome::BlackWins => Some(Player::Black),
            Outcome::Draw => None,
        }
    }
}

/// Decide whether the game is over by the board alone.
///
/// Only applies once placement is finished. A side with fewer than three
/// stones has lost, and so has a side to move without any legal move.
/// Repetition draws are not visible here; see [`crate::repetition`].
pub fn game_over(pos: &Position) -> Option<Outcome> {
    if pos.in_placement() {
        return None;
    }

    for player in [Player::White, Player::Black] {
        if pos.stones(player) < MIN_STONES {
            return Some(Outcome::win_for(player.opponent()));
        }
    }

    if !has_legal_move(pos) {
        return Some(Outcome::win_for(pos.player.opponent()));
    }

    None
}

/// Score a position.
///
/// A decided position scores `END_GAME` in the winner's direction, pulled
/// toward zero by one per ply from the root so that quicker wins and slower
/// losses are preferred. Anything else scores material and mobility.
pub fn evaluate(
    pos: &Position,
    params: &SearchParameters,
    outcome: Option<Outcome>,
    plies_from_root: u32,
) -> Eval {
    match outcome {
        Some(outcome) => terminal_score(outcome, params.end_game, plies_from_root),
        None => {
            let material = material(pos).saturating_mul(params.piece);
            let freedom = freedom(pos).saturating_mul(params.freedom);
            material.saturating_add(freedom)
        }
    }
}

fn terminal_score(outcome: Outcome, end_game: Eval, plies_from_root: u32) -> Eval {
    let sign = outcome.sign();
    let distance = Eval::try_from(plies_from_root).unwrap_or(Eval::MAX);
    sign.saturating_mul(end_game)
        .saturating_sub(sign.saturating_mul(distance))
}

/// White stones minus Black stones.
pub fn material(pos: &Position) -> Eval {
    pos.stones(Player::White) as Eval - pos.stones(Player::Black) as Eval
}

/// White mobility minus Black mobility.
pub fn freedom(pos: &Position) -> Eval {
    side_freedom(pos, Player::White) - side_freedom(pos, Player::Black)
}

/// Free adjacent nodes summed over a side's stones, or a fixed credit for a
/// flying side.
fn side_freedom(pos: &Position, player: Player) -> Eval {
    if pos.phase_of(player) == Phase::Flying {
        return THREE_PIECES_FREEDOM;
    }
    pos.board
        .stones(player)
        .map(|n| pos.board.freedom(n) as Eval)
        .sum()
}
