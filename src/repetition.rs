//! Threefold repetition detection.
//!
//! A position is reduced to a [`Fingerprint`]: two bits per node (`01`
//! White, `10` Black) in bits 0..48 and the side to move in bit 48. Ply
//! counters and stone counts are not part of it.
//!
//! The [`RepetitionTracker`] remembers fingerprints seen once and seen twice
//! since the last capture. Positions before a capture can never come back,
//! so the tracker is cleared whenever a capture is committed.

use std::collections::HashSet;

use crate::board::{Board, Cell, Player};
use crate::position::Position;

const WHITE_BITS: u64 = 0b01;
const BLACK_BITS: u64 = 0b10;
const PLAYER_SHIFT: u32 = 48;

/// Packed (board, side to move) pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    pub fn new(board: &Board, player: Player) -> Self {
        let mut bits = 0u64;
        for (i, cell) in board.cells().iter().enumerate() {
            let code = match cell {
                Cell::Empty => 0,
                Cell::White => WHITE_BITS,
                Cell::Black => BLACK_BITS,
            };
            bits |= code << (i * 2);
        }
        if player == Player::Black {
            bits |= 1 << PLAYER_SHIFT;
        }
        Fingerprint(bits)
    }

    pub fn of(pos: &Position) -> Self {
        Self::new(&pos.board, pos.player)
    }
}

/// How often a fingerprint has been seen, including the current sighting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Occurrence {
    First,
    Second,
    Third,
}

impl Occurrence {
    #[inline]
    pub fn is_repetition(self) -> bool {
        self == Occurrence::Third
    }
}

#[derive(Clone, Debug, Default)]
pub struct RepetitionTracker {
    once: HashSet<Fingerprint>,
    twice: HashSet<Fingerprint>,
}

impl RepetitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sighting of `fp` and report which occurrence it was.
    ///
    /// A third sighting leaves the tracker unchanged; further sightings keep
    /// reporting [`Occurrence::Third`].
    pub fn observe(&mut self, fp: Fingerprint) -> Occurrence {
        if self.twice.contains(&fp) {
            return Occurrence::Third;
        }
        if self.once.remove(&fp) {
            self.twice.insert(fp);
            return Occurrence::Second;
        }
        self.once.insert(fp);
        Occurrence::First
    }

    /// Undo the sighting that `observe` reported as `occurrence`.
    ///
    /// Sightings must be forgotten in reverse order of observation.
    pub fn forget(&mut self, fp: Fingerprint, occurrence: Occurrence) {
        match occurrence {
            Occurrence::First => {
                let removed = self.once.remove(&fp);
                debug_assert!(removed, "forgetting an unseen fingerprint");
            }
            Occurrence::Second => {
                let removed = self.twice.remove(&fp);
                debug_assert!(removed, "forgetting an unseen fingerprint");
                self.once.insert(fp);
            }
            Occurrence::Third => {}
        }
    }

    pub fn clear(&mut self) {
        self.once.clear();
        self.twice.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.once.is_empty() && self.twice.is_empty()
    }

    /// Number of distinct fingerprints held.
    pub fn len(&self) -> usize {
        self.once.len() + self.twice.len()
    }
}
