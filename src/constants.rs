//! Constants for board dimensions, rule thresholds, and search defaults.
//!
//! This module contains all the configuration constants for the engine.
//! Runtime-tunable values only provide their defaults here; see
//! [`crate::parameters::SearchParameters`] for the values a search uses.

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of nodes on the board (three nested squares of eight).
pub const NODES: usize = 24;

/// Number of straight three-node lines.
pub const MILLS: usize = 16;

/// Stones each side brings into the game.
pub const STONES_PER_SIDE: usize = 9;

// =============================================================================
// Rule Thresholds
// =============================================================================

/// Plies spent placing stones before sliding starts (9 per side).
pub const PLACEMENT_PLIES: u32 = 18;

/// A side with this many stones may fly to any empty node.
pub const FLYING_STONES: usize = 3;

/// A side with fewer stones than this (after placement) has lost.
pub const MIN_STONES: usize = 3;

/// Upper bound on the moves available in any position with at most nine
/// stones a side.
///
/// The worst case is sliding, not flying: nine stones can line up ten
/// mill-closing slides, and each one fans out into a take of any of nine
/// loose opposing stones. `w:1,3,5,7,9,11,13,18,19;b:0,2,6,8,12,15,16,21,23`
/// has 92 moves. Counting every target's plain and mill-closing moves over
/// all boards, with takes capped by the opposing stone count, gives at most
/// 95. Placement peaks at 64 and flying at 63.
pub const MAX_MOVES: usize = 95;

// =============================================================================
// Evaluation
// =============================================================================

/// Evaluation type. Positive favors White, negative favors Black.
pub type Eval = i32;

/// Lowest possible evaluation, used as the initial alpha.
pub const MIN_EVALUATION: Eval = Eval::MIN;

/// Highest possible evaluation, used as the initial beta.
pub const MAX_EVALUATION: Eval = Eval::MAX;

/// Mobility credited to a flying side instead of counting its free nodes.
pub const THREE_PIECES_FREEDOM: Eval = 36;

// =============================================================================
// Default Search Parameters
// =============================================================================

/// Weight per stone of material advantage.
pub const DEFAULT_PIECE: Eval = 7;

/// Weight per free adjacent node of mobility advantage.
pub const DEFAULT_FREEDOM: Eval = 1;

/// Multiplier applied to a decided game.
pub const DEFAULT_END_GAME: Eval = MAX_EVALUATION;

/// Search depth in plies.
pub const DEFAULT_DEPTH: u32 = 5;
