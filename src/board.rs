//! Cell and player types and the 24-node board.
//!
//! Cells are stored as signed bytes (`White = 1`, `Black = -1`, `Empty = 0`)
//! so summing a board gives the material balance from White's side.

use std::fmt;

use crate::constants::NODES;
use crate::topology::{MILL_PARTNERS, Node, neighbors};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Cell {
    #[default]
    Empty = 0,
    White = 1,
    Black = -1,
}

impl Cell {
    /// Signed value: +1 for White, -1 for Black, 0 for empty.
    #[inline]
    pub fn sign(self) -> i32 {
        self as i8 as i32
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// The cell a stone of this player occupies.
    #[inline]
    pub fn cell(self) -> Cell {
        match self {
            Player::White => Cell::White,
            Player::Black => Cell::Black,
        }
    }

    /// +1 for White (the maximizing side), -1 for Black.
    #[inline]
    pub fn sign(self) -> i32 {
        self.cell().sign()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "white"),
            Player::Black => write!(f, "black"),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Cell; NODES],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, node: Node) -> Cell {
        self.cells[node]
    }

    #[inline]
    pub fn set(&mut self, node: Node, cell: Cell) {
        self.cells[node] = cell;
    }

    #[inline]
    pub fn is_empty(&self, node: Node) -> bool {
        self.cells[node] == Cell::Empty
    }

    pub fn cells(&self) -> &[Cell; NODES] {
        &self.cells
    }

    /// Nodes occupied by `player`, ascending.
    pub fn stones(&self, player: Player) -> impl Iterator<Item = Node> + '_ {
        let cell = player.cell();
        (0..NODES).filter(move |&n| self.cells[n] == cell)
    }

    /// Empty nodes, ascending.
    pub fn empty_nodes(&self) -> impl Iterator<Item = Node> + '_ {
        (0..NODES).filter(move |&n| self.cells[n] == Cell::Empty)
    }

    pub fn count(&self, player: Player) -> usize {
        let cell = player.cell();
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// White stones minus Black stones.
    pub fn material(&self) -> i32 {
        self.cells.iter().map(|c| c.sign()).sum()
    }

    /// Whether the stone of `player` on `node` is part of a mill.
    ///
    /// `node` must hold a stone of `player`.
    pub fn is_mill(&self, player: Player, node: Node) -> bool {
        let cell = player.cell();
        debug_assert_eq!(self.cells[node], cell);

        MILL_PARTNERS[node]
            .iter()
            .any(|&[a, b]| self.cells[a] == cell && self.cells[b] == cell)
    }

    /// Whether every stone of `player` sits in a mill. Vacuously true when
    /// the player has no stones.
    pub fn all_in_mills(&self, player: Player) -> bool {
        self.stones(player).all(|n| self.is_mill(player, n))
    }

    /// Number of empty nodes adjacent to `node`.
    pub fn freedom(&self, node: Node) -> usize {
        neighbors(node).iter().filter(|&&n| self.is_empty(n)).count()
    }

    /// Empty nodes adjacent to `node`, ascending.
    pub fn free_neighbors(&self, node: Node) -> impl Iterator<Item = Node> + '_ {
        neighbors(node).iter().copied().filter(move |&n| self.is_empty(n))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c: Vec<char> = self
            .cells
            .iter()
            .map(|cell| match cell {
                Cell::White => 'W',
                Cell::Black => 'B',
                Cell::Empty => '.',
            })
            .collect();

        writeln!(f, "{}-----------{}-----------{}", c[0], c[1], c[2])?;
        writeln!(f, "|           |           |")?;
        writeln!(f, "|   {}-------{}-------{}   |", c[3], c[4], c[5])?;
        writeln!(f, "|   |       |       |   |")?;
        writeln!(f, "|   |   {}---{}---{}   |   |", c[6], c[7], c[8])?;
        writeln!(f, "|   |   |       |   |   |")?;
        writeln!(
            f,
            "{}---{}---{}       {}---{}---{}",
            c[9], c[10], c[11], c[12], c[13], c[14]
        )?;
        writeln!(f, "|   |   |       |   |   |")?;
        writeln!(f, "|   |   {}---{}---{}   |   |", c[15], c[16], c[17])?;
        writeln!(f, "|   |       |       |   |")?;
        writeln!(f, "|   {}-------{}-------{}   |", c[18], c[19], c[20])?;
        writeln!(f, "|           |           |")?;
        writeln!(f, "{}-----------{}-----------{}", c[21], c[22], c[23])
    }
}
