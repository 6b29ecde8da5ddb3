//! Position representation and move execution.
//!
//! This module provides the core game state:
//! - [`Move`], a tagged value with one payload per move shape
//! - [`Position`], the board plus side to move and ply counters
//! - In-place `make_move`/`unmake_move`, used by both the move generator
//!   and the search
//! - The position snapshot string format (`w:0,1;b:5;b;3;3`)
//!
//! Mutation is done in place rather than by copying, so every
//! `make_move` must be paired with an `unmake_move` of the same move.

use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Cell, Player};
use crate::constants::{FLYING_STONES, NODES, PLACEMENT_PLIES, STONES_PER_SIDE};
use crate::error::ParsePositionError;
use crate::topology::Node;

/// A single ply. Capturing moves carry their take target in the same value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// Put a stone from the reserve on `target`.
    Place { target: Node },
    /// Slide or fly a stone from `source` to `target`.
    Move { source: Node, target: Node },
    /// Place on `target`, closing a mill, and remove the stone on `captured`.
    PlaceTake { target: Node, captured: Node },
    /// Move to `target`, closing a mill, and remove the stone on `captured`.
    MoveTake {
        source: Node,
        target: Node,
        captured: Node,
    },
}

impl Move {
    /// The node the mover's stone ends up on.
    pub fn target(&self) -> Node {
        match *self {
            Move::Place { target }
            | Move::Move { target, .. }
            | Move::PlaceTake { target, .. }
            | Move::MoveTake { target, .. } => target,
        }
    }

    /// The node a stone leaves, for `Move` and `MoveTake`.
    pub fn source(&self) -> Option<Node> {
        match *self {
            Move::Move { source, .. } | Move::MoveTake { source, .. } => Some(source),
            Move::Place { .. } | Move::PlaceTake { .. } => None,
        }
    }

    /// The opposing stone removed by this move, if any.
    pub fn captured(&self) -> Option<Node> {
        match *self {
            Move::PlaceTake { captured, .. } | Move::MoveTake { captured, .. } => Some(captured),
            Move::Place { .. } | Move::Move { .. } => None,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured().is_some()
    }
}

/// Raw index form: `P5`, `P5x9`, `M3-4`, `M3-4x9`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::Place { target } => write!(f, "P{target}"),
            Move::PlaceTake { target, captured } => write!(f, "P{target}x{captured}"),
            Move::Move { source, target } => write!(f, "M{source}-{target}"),
            Move::MoveTake {
                source,
                target,
                captured,
            } => write!(f, "M{source}-{target}x{captured}"),
        }
    }
}

/// Which rule set governs a side's next move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// First 18 plies: stones come from the reserve onto any empty node.
    Placement,
    /// Stones slide along lines to adjacent empty nodes.
    Sliding,
    /// Exactly three stones left: any stone to any empty node.
    Flying,
}

/// State needed to take back a move that `make_move` cannot recompute.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Undo {
    plies_without_mills: u32,
}

/// A position: board, side to move and ply counters.
///
/// Stone counts are cached alongside the board and kept in step by
/// `make_move`/`unmake_move`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub board: Board,
    /// Side to move
    pub player: Player,
    /// Plies played since the start of the game
    pub plies: u32,
    /// Plies since the last capture
    pub plies_without_mills: u32,
    white_stones: usize,
    black_stones: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// The empty starting position, White to move.
    pub fn new() -> Self {
        Self::from_board(Board::new(), Player::White, 0, 0)
    }

    /// Build a position around an existing board, counting its stones.
    pub fn from_board(board: Board, player: Player, plies: u32, plies_without_mills: u32) -> Self {
        Self {
            board,
            player,
            plies,
            plies_without_mills,
            white_stones: board.count(Player::White),
            black_stones: board.count(Player::Black),
        }
    }

    /// Stones `player` has on the board.
    #[inline]
    pub fn stones(&self, player: Player) -> usize {
        match player {
            Player::White => self.white_stones,
            Player::Black => self.black_stones,
        }
    }

    #[inline]
    fn stones_mut(&mut self, player: Player) -> &mut usize {
        match player {
            Player::White => &mut self.white_stones,
            Player::Black => &mut self.black_stones,
        }
    }

    #[inline]
    pub fn in_placement(&self) -> bool {
        self.plies < PLACEMENT_PLIES
    }

    /// Phase for the side to move.
    pub fn phase(&self) -> Phase {
        self.phase_of(self.player)
    }

    /// Phase `player` would be in if it were to move now.
    pub fn phase_of(&self, player: Player) -> Phase {
        if self.in_placement() {
            Phase::Placement
        } else if self.stones(player) == FLYING_STONES {
            Phase::Flying
        } else {
            Phase::Sliding
        }
    }

    /// Apply `mv` for the side to move.
    ///
    /// # Panics
    /// If the move does not fit the board: placing or moving onto an occupied
    /// node, moving a stone that is not the mover's, or taking anything but
    /// an opposing stone.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let undo = Undo {
            plies_without_mills: self.plies_without_mills,
        };
        let mover = self.player;

        match mv {
            Move::Place { target } => self.put(mover, target),
            Move::Move { source, target } => self.shift(mover, source, target),
            Move::PlaceTake { target, captured } => {
                self.put(mover, target);
                self.take(mover.opponent(), captured);
            }
            Move::MoveTake {
                source,
                target,
                captured,
            } => {
                self.shift(mover, source, target);
                self.take(mover.opponent(), captured);
            }
        }

        if mv.is_capture() {
            self.plies_without_mills = 0;
        } else {
            self.plies_without_mills += 1;
        }
        self.player = mover.opponent();
        self.plies += 1;

        undo
    }

    /// Take back `mv`, which must be the last move made on this position.
    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        let mover = self.player.opponent();
        self.player = mover;
        self.plies -= 1;
        self.plies_without_mills = undo.plies_without_mills;

        match mv {
            Move::Place { target } => self.lift(mover, target),
            Move::Move { source, target } => self.shift(mover, target, source),
            Move::PlaceTake { target, captured } => {
                self.restore(mover.opponent(), captured);
                self.lift(mover, target);
            }
            Move::MoveTake {
                source,
                target,
                captured,
            } => {
                self.restore(mover.opponent(), captured);
                self.shift(mover, target, source);
            }
        }
    }

    fn put(&mut self, player: Player, node: Node) {
        assert!(self.board.is_empty(node), "place on occupied node {node}");
        self.board.set(node, player.cell());
        *self.stones_mut(player) += 1;
    }

    fn lift(&mut self, player: Player, node: Node) {
        assert_eq!(self.board.get(node), player.cell(), "lift from node {node}");
        self.board.set(node, Cell::Empty);
        *self.stones_mut(player) -= 1;
    }

    fn shift(&mut self, player: Player, from: Node, to: Node) {
        assert_eq!(self.board.get(from), player.cell(), "move from node {from}");
        assert!(self.board.is_empty(to), "move onto occupied node {to}");
        self.board.set(from, Cell::Empty);
        self.board.set(to, player.cell());
    }

    fn take(&mut self, victim: Player, node: Node) {
        assert_eq!(self.board.get(node), victim.cell(), "take from node {node}");
        self.board.set(node, Cell::Empty);
        *self.stones_mut(victim) -= 1;
    }

    fn restore(&mut self, victim: Player, node: Node) {
        assert!(self.board.is_empty(node), "restore onto occupied node {node}");
        self.board.set(node, victim.cell());
        *self.stones_mut(victim) += 1;
    }
}

fn color_letter(player: Player) -> char {
    match player {
        Player::White => 'w',
        Player::Black => 'b',
    }
}

fn parse_color(s: &str) -> Result<Player, ParsePositionError> {
    match s {
        "w" => Ok(Player::White),
        "b" => Ok(Player::Black),
        other => Err(ParsePositionError::InvalidColor(other.to_string())),
    }
}

/// Parse `c:n,n,...` into a color and its nodes.
fn parse_stones(field: &str) -> Result<(Player, Vec<Node>), ParsePositionError> {
    let (color, list) = field
        .split_once(':')
        .ok_or_else(|| ParsePositionError::InvalidColor(field.to_string()))?;
    let player = parse_color(color.trim())?;

    let mut nodes = Vec::new();
    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let node: Node = token
            .parse()
            .map_err(|_| ParsePositionError::InvalidNode(token.to_string()))?;
        if node >= NODES {
            return Err(ParsePositionError::NodeOutOfRange(node));
        }
        nodes.push(node);
    }
    if nodes.len() > STONES_PER_SIDE {
        return Err(ParsePositionError::TooManyStones { count: nodes.len() });
    }

    Ok((player, nodes))
}

fn parse_counter(s: &str) -> Result<u32, ParsePositionError> {
    s.trim()
        .parse()
        .map_err(|_| ParsePositionError::InvalidCounter(s.to_string()))
}

/// Parse a snapshot of the form `w:<nodes>;b:<nodes>;<w|b>;<plies>;<plies_without_mills>`.
impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split(';').collect();
        if fields.len() != 5 {
            return Err(ParsePositionError::FieldCount {
                found: fields.len(),
            });
        }

        let (first, first_nodes) = parse_stones(fields[0])?;
        let (second, second_nodes) = parse_stones(fields[1])?;
        if first == second {
            return Err(ParsePositionError::DuplicateColor);
        }

        let mut board = Board::new();
        for (player, nodes) in [(first, first_nodes), (second, second_nodes)] {
            for node in nodes {
                if !board.is_empty(node) {
                    return Err(ParsePositionError::NodeOccupied(node));
                }
                board.set(node, player.cell());
            }
        }

        let player = parse_color(fields[2].trim())?;
        let plies = parse_counter(fields[3])?;
        let plies_without_mills = parse_counter(fields[4])?;

        Ok(Position::from_board(board, player, plies, plies_without_mills))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, player) in [Player::White, Player::Black].into_iter().enumerate() {
            let nodes: Vec<String> = self.board.stones(player).map(|n| n.to_string()).collect();
            if i > 0 {
                write!(f, ";")?;
            }
            write!(f, "{}:{}", color_letter(player), nodes.join(","))?;
        }
        write!(
            f,
            ";{};{};{}",
            color_letter(self.player),
            self.plies,
            self.plies_without_mills
        )
    }
}
